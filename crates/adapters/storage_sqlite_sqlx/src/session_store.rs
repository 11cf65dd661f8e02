//! `SQLite` implementation of [`SessionStore`].

use chrono::Duration;
use sqlx::SqlitePool;

use homechart_app::ports::SessionStore;
use homechart_domain::error::HomeChartError;
use homechart_domain::id::{HomeId, SessionToken};
use homechart_domain::time::now;

use crate::error::StorageError;

const INSERT: &str = "INSERT INTO sessions (token, home_id, expires_at) VALUES (?, ?, ?)";

const SELECT_LIVE: &str = "SELECT home_id FROM sessions WHERE token = ? AND expires_at > ?";

const DELETE_EXPIRED: &str = "DELETE FROM sessions WHERE expires_at <= ?";

/// `SQLite`-backed session store.
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Delete every expired session, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    pub async fn purge_expired(&self) -> Result<u64, HomeChartError> {
        let result = sqlx::query(DELETE_EXPIRED)
            .bind(now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(result.rows_affected())
    }
}

impl SessionStore for SqliteSessionStore {
    async fn open_session(
        &self,
        home_id: HomeId,
        ttl: Duration,
    ) -> Result<SessionToken, HomeChartError> {
        let token = SessionToken::new();
        let expires_at = now() + ttl;

        sqlx::query(INSERT)
            .bind(token.as_uuid())
            .bind(home_id.get())
            .bind(expires_at.timestamp())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(token)
    }

    async fn home_for_session(
        &self,
        token: SessionToken,
    ) -> Result<Option<HomeId>, HomeChartError> {
        let row: Option<(i64,)> = sqlx::query_as(SELECT_LIVE)
            .bind(token.as_uuid())
            .bind(now().timestamp())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let Some((raw,)) = row else {
            return Ok(None);
        };
        let home_id = HomeId::new(raw).map_err(|_| StorageError::InvalidHomeId(raw))?;
        Ok(Some(home_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteSessionStore {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteSessionStore::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_resolve_open_session() {
        let store = setup().await;
        let home = HomeId::new(12).unwrap();

        let token = store.open_session(home, Duration::hours(1)).await.unwrap();

        assert_eq!(store.home_for_session(token).await.unwrap(), Some(home));
    }

    #[tokio::test]
    async fn should_return_none_for_unknown_token() {
        let store = setup().await;
        let result = store.home_for_session(SessionToken::new()).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn should_return_none_for_expired_session() {
        let store = setup().await;
        let token = store
            .open_session(HomeId::new(12).unwrap(), Duration::seconds(-10))
            .await
            .unwrap();

        assert_eq!(store.home_for_session(token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_purge_only_expired_sessions() {
        let store = setup().await;
        let home = HomeId::new(4).unwrap();
        store
            .open_session(home, Duration::seconds(-10))
            .await
            .unwrap();
        store
            .open_session(home, Duration::seconds(-5))
            .await
            .unwrap();
        let live = store.open_session(home, Duration::hours(1)).await.unwrap();

        let purged = store.purge_expired().await.unwrap();

        assert_eq!(purged, 2);
        assert_eq!(store.home_for_session(live).await.unwrap(), Some(home));
    }
}
