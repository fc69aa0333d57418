use serde::{Deserialize, Serialize};
use std::env;

/// Runtime configuration, built once at startup from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub database: DatabaseConfig,
    pub list: ListConfig,
    /// Base URL of the external identity service. When set, every entry
    /// operation requires a bearer token resolved against this service;
    /// when unset, the server runs single-tenant with identity implicit.
    pub identity_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DAYLOG_PORT").or_else(|_| env::var("PORT")) {
            self.port = v.parse().unwrap_or(self.port);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DAYLOG_LIST_DEFAULT_LIMIT") {
            self.list.default_limit = v.parse().unwrap_or(self.list.default_limit);
        }
        if let Ok(v) = env::var("DAYLOG_LIST_MAX_LIMIT") {
            self.list.max_limit = v.parse().unwrap_or(self.list.max_limit);
        }
        if let Ok(v) = env::var("IDENTITY_URL") {
            if !v.trim().is_empty() {
                self.identity_url = Some(v);
            }
        }
        self
    }

    fn defaults() -> Self {
        Self {
            port: 3000,
            database: DatabaseConfig {
                url: "sqlite://daylog.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            list: ListConfig {
                default_limit: 365,
                max_limit: 1000,
            },
            identity_url: None,
        }
    }
}
