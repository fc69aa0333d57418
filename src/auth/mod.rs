// Bearer credential extraction and external identity resolution.
//
// The resolver is an injected capability so tests can substitute a fake;
// resolved identities live only for the duration of one request.

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingCredential,

    #[error("Authorization header must use Bearer token format")]
    MalformedCredential,

    #[error("invalid token")]
    InvalidToken,

    #[error("identity service unavailable")]
    ServiceUnavailable,
}

/// Resolve a bearer token to a stable external user identifier.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<String, AuthError>;
}

/// Extract the bearer token from the Authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers
        .get("authorization")
        .ok_or(AuthError::MissingCredential)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::MalformedCredential),
    }
}

/// Identity resolver backed by an external HTTP identity service.
///
/// Calls GET {base_url}/user with the bearer token and expects a JSON body
/// carrying the stable user id. Any failure (network, non-2xx, unparseable
/// body) fails closed.
pub struct HttpIdentityResolver {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    id: String,
}

impl HttpIdentityResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<String, AuthError> {
        let url = format!("{}/user", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("identity service request failed: {}", e);
                AuthError::ServiceUnavailable
            })?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken);
        }

        let identity: IdentityResponse = response
            .json()
            .await
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(identity.id)
    }
}
