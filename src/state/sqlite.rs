use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::SessionStore;
use crate::models::SearchRequest;

/// SQLite implementation of SessionStore
pub struct SqliteSessionStore {
    pool: SqlitePool,
}

impl SqliteSessionStore {
    /// Open (and create if missing) the session database at `database_url`
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Opening session database: {}", database_url);

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // One connection: a session has a single writer, and in-memory
        // databases are per connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, key: &str) -> Result<Option<SearchRequest>> {
        let row = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT value FROM session_state WHERE key = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        let Some((value,)) = row else {
            return Ok(None);
        };

        match serde_json::from_str(&value) {
            Ok(request) => Ok(Some(request)),
            Err(e) => {
                warn!("Ignoring unreadable session state under {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, request: &SearchRequest) -> Result<()> {
        let value = serde_json::to_string(request)?;

        sqlx::query(
            r#"
            INSERT INTO session_state (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!("Stored session state under {}", key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM session_state WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        info!("Removed session state under {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchType;
    use crate::state::SESSION_KEY;

    async fn create_test_store() -> SqliteSessionStore {
        // Use in-memory database for tests
        SqliteSessionStore::new("sqlite::memory:").await.unwrap()
    }

    fn sample_request() -> SearchRequest {
        SearchRequest {
            query: "Umschlag scannen".to_string(),
            sources: ["jira".to_string(), "wiki".to_string()].into_iter().collect(),
            search_type: SearchType::Embedding,
            top_k: Some(7),
            enable_generative: true,
            prompt_extension: Some("Antworte kurz".to_string()),
        }
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = create_test_store().await;
        assert!(store.get(SESSION_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_round_trips_all_fields() {
        let store = create_test_store().await;
        let request = sample_request();

        store.set(SESSION_KEY, &request).await.unwrap();
        assert_eq!(store.get(SESSION_KEY).await.unwrap(), Some(request));
    }

    #[tokio::test]
    async fn test_absent_optionals_round_trip() {
        let store = create_test_store().await;
        let mut request = sample_request();
        request.top_k = None;
        request.prompt_extension = None;

        store.set(SESSION_KEY, &request).await.unwrap();
        assert_eq!(store.get(SESSION_KEY).await.unwrap(), Some(request));
    }

    #[tokio::test]
    async fn test_set_replaces_existing_value() {
        let store = create_test_store().await;
        store.set(SESSION_KEY, &sample_request()).await.unwrap();

        let replacement = SearchRequest::default();
        store.set(SESSION_KEY, &replacement).await.unwrap();

        assert_eq!(store.get(SESSION_KEY).await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = create_test_store().await;
        store.set(SESSION_KEY, &sample_request()).await.unwrap();
        store.remove(SESSION_KEY).await.unwrap();

        assert!(store.get(SESSION_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pascal_case_value_is_accepted() {
        let store = create_test_store().await;
        sqlx::query("INSERT INTO session_state (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(SESSION_KEY)
            .bind(concat!(
                r#"{"Query":"alt","Sources":["jira"],"SearchType":"Keyword","#,
                r#""TopK":20,"EnableGenerative":false,"PromptExtension":null}"#
            ))
            .bind(Utc::now().to_rfc3339())
            .execute(&store.pool)
            .await
            .unwrap();

        let request = store.get(SESSION_KEY).await.unwrap().unwrap();
        assert_eq!(request.query, "alt");
        assert_eq!(request.search_type, SearchType::Keyword);
        assert_eq!(request.top_k, Some(20));
    }

    #[tokio::test]
    async fn test_unreadable_value_reads_as_absent() {
        let store = create_test_store().await;
        sqlx::query("INSERT INTO session_state (key, value, updated_at) VALUES (?, ?, ?)")
            .bind(SESSION_KEY)
            .bind("{not json")
            .bind(Utc::now().to_rfc3339())
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(store.get(SESSION_KEY).await.unwrap().is_none());
    }
}
