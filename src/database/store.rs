// Entry store: parameterized SQL over the entries table.
//
// Every statement binds values through sqlx placeholders; the only dynamic
// pieces of SQL text are column names from the fixed set below and the
// internally-clamped row limit.

use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use crate::config::ListConfig;
use crate::database::StoreError;
use crate::entries::{Entry, EntryPatch, NewEntry};

const ENTRY_COLUMNS: &str = "id, user_id, date, score, text, iv, badge, color";

/// Optional bounds for the list operation.
#[derive(Debug, Default)]
pub struct ListFilter {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<i64>,
}

/// Aggregate statistics over the full matching set of entries.
///
/// avg/min/max are null when count is zero.
#[derive(Debug, Serialize, FromRow)]
pub struct Stats {
    pub count: i64,
    pub avg: Option<f64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Owns the persistent entries table. In multi-tenant mode every operation
/// is called with the resolved user id and scopes its statement to that
/// owner; with `None` the store behaves as a single global tenant.
#[derive(Clone)]
pub struct EntryStore {
    pool: SqlitePool,
    list: ListConfig,
}

impl EntryStore {
    pub fn new(pool: SqlitePool, list: ListConfig) -> Self {
        Self { pool, list }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert one row and return it as persisted, id included.
    pub async fn create(
        &self,
        user_id: Option<&str>,
        date: &str,
        new: &NewEntry,
    ) -> Result<Entry, StoreError> {
        let entry = sqlx::query_as::<_, Entry>(&format!(
            "INSERT INTO entries (user_id, date, score, text, iv, badge, color)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(user_id)
        .bind(date)
        .bind(new.score)
        .bind(&new.text)
        .bind(&new.iv)
        .bind(&new.badge)
        .bind(&new.color)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(entry)
    }

    /// List entries newest-first: date descending, then id descending so
    /// same-day entries come back in reverse insertion order.
    pub async fn list(
        &self,
        user_id: Option<&str>,
        filter: &ListFilter,
    ) -> Result<Vec<Entry>, StoreError> {
        let limit = self.effective_limit(filter.limit);

        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE 1=1"
        ));
        if let Some(uid) = user_id {
            qb.push(" AND user_id = ").push_bind(uid.to_string());
        }
        if let Some(from) = &filter.from {
            qb.push(" AND date >= ").push_bind(from.clone());
        }
        if let Some(to) = &filter.to {
            qb.push(" AND date <= ").push_bind(to.clone());
        }
        qb.push(" ORDER BY date DESC, id DESC LIMIT ").push_bind(limit);

        let entries = qb
            .build_query_as::<Entry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Aggregates over the full matching set, not the limited page.
    pub async fn stats(&self, user_id: Option<&str>) -> Result<Stats, StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) AS count, AVG(score) AS avg,
                    MIN(score) AS min, MAX(score) AS max
             FROM entries WHERE 1=1",
        );
        if let Some(uid) = user_id {
            qb.push(" AND user_id = ").push_bind(uid.to_string());
        }

        let mut stats = qb
            .build_query_as::<Stats>()
            .fetch_one(&self.pool)
            .await?;

        // one decimal place
        stats.avg = stats.avg.map(|a| (a * 10.0).round() / 10.0);
        Ok(stats)
    }

    /// Apply a patch to one row. Only fields present in the patch are
    /// touched. Returns None when no row matched (unknown id, or a row
    /// owned by someone else in multi-tenant mode).
    ///
    /// Callers must reject empty patches before reaching the store; an
    /// empty patch here is a constraint error, never a no-op success.
    pub async fn update(
        &self,
        id: i64,
        user_id: Option<&str>,
        patch: &EntryPatch,
    ) -> Result<Option<Entry>, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::Constraint("no fields to update".to_string()));
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE entries SET ");
        let mut set = qb.separated(", ");
        if let Some(score) = patch.score {
            set.push("score = ").push_bind_unseparated(score);
        }
        if let Some(text) = &patch.text {
            set.push("text = ").push_bind_unseparated(text.clone());
        }
        if let Some(date) = &patch.date {
            set.push("date = ").push_bind_unseparated(date.clone());
        }
        if let Some(iv) = &patch.iv {
            set.push("iv = ").push_bind_unseparated(iv.clone());
        }
        if let Some(badge) = &patch.badge {
            set.push("badge = ").push_bind_unseparated(badge.clone());
        }
        if let Some(color) = &patch.color {
            set.push("color = ").push_bind_unseparated(color.clone());
        }

        qb.push(" WHERE id = ").push_bind(id);
        if let Some(uid) = user_id {
            qb.push(" AND user_id = ").push_bind(uid.to_string());
        }
        qb.push(format!(" RETURNING {ENTRY_COLUMNS}"));

        let entry = qb
            .build_query_as::<Entry>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(entry)
    }

    /// Idempotent: deleting an unknown or already-deleted id is a success.
    pub async fn delete(&self, id: i64, user_id: Option<&str>) -> Result<(), StoreError> {
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM entries WHERE id = ");
        qb.push_bind(id);
        if let Some(uid) = user_id {
            qb.push(" AND user_id = ").push_bind(uid.to_string());
        }

        qb.build().execute(&self.pool).await?;
        Ok(())
    }

    /// Clamp a requested row limit into [1, max], defaulting when absent.
    pub fn effective_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.list.default_limit)
            .clamp(1, self.list.max_limit)
    }

    /// Close the underlying pool (on shutdown).
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.message().contains("constraint") => {
            StoreError::Constraint(db.message().to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}
