use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::SessionStore;
use crate::models::SearchRequest;

/// Session store that lives only as long as the process
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, SearchRequest>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<SearchRequest>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, request: &SearchRequest) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), request.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
