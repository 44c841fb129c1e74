/*
 * Responsibility
 * - links table access (select-by-owner / insert)
 * - The store owns the records; this layer never updates or deletes them
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::error::{StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LinkRow {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A record to insert. `user_id` always comes from the authenticated caller.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub user_id: String,
    pub title: String,
    pub url: String,
}

/// Table-scoped client for the hosted link store.
///
/// Implementations are shared across requests behind an `Arc`.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    // Returns the store backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // All records whose `user_id` equals the given value.
    async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<LinkRow>>;

    // Insert one record and return what the store reports as inserted.
    async fn insert(&self, link: NewLink) -> StoreResult<Vec<LinkRow>>;
}

#[derive(Clone, Debug)]
pub struct PgLinkStore {
    pool: PgPool,
}

impl PgLinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list_for_user(&self, user_id: &str) -> StoreResult<Vec<LinkRow>> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT
                id, user_id, title, url, created_at
            FROM links
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, link: NewLink) -> StoreResult<Vec<LinkRow>> {
        // Single statement: the row either lands or the error comes back.
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (user_id, title, url)
            VALUES ($1, $2, $3)
            RETURNING
                id, user_id, title, url, created_at
            "#,
        )
        .bind(&link.user_id)
        .bind(&link.title)
        .bind(&link.url)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(StoreError::Backend(
                "insert into links returned no rows".to_string(),
            ));
        }

        Ok(rows)
    }
}
