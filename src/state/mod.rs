pub mod link;
pub mod memory;
pub mod reconcile;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::SearchRequest;
pub use link::PartialSearchRequest;
pub use reconcile::{reconcile, Reconciled};

/// Key under which the session's request is persisted
pub const SESSION_KEY: &str = "SearchRequest";

/// Key-value persistence for search requests
/// This allows swapping storage implementations (SQLite, in-memory)
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the request stored under `key`
    async fn get(&self, key: &str) -> Result<Option<SearchRequest>>;

    /// Store or replace the request under `key`
    async fn set(&self, key: &str, request: &SearchRequest) -> Result<()>;

    /// Forget the request under `key`
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Owns the session's search state: reconciles it on load and persists edits
#[derive(Clone)]
pub struct SearchStateStore {
    store: Arc<dyn SessionStore>,
    defaults: SearchRequest,
    key: String,
}

impl SearchStateStore {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            defaults: SearchRequest::default(),
            key: SESSION_KEY.to_string(),
        }
    }

    /// Persisted request, or `None` when absent or unreadable
    async fn persisted(&self) -> Option<SearchRequest> {
        match self.store.get(&self.key).await {
            Ok(request) => request,
            Err(e) => {
                warn!("Failed to read persisted search state: {}", e);
                None
            }
        }
    }

    /// Reconcile defaults, persisted state and link parameters.
    ///
    /// The persisted lookup completes before link values are applied. This
    /// never fails; a broken store behaves like an empty one.
    pub async fn load(&self, link: &PartialSearchRequest) -> Reconciled {
        let persisted = self.persisted().await;
        debug!("Persisted search state present: {}", persisted.is_some());
        if link.is_empty() {
            debug!("Link carries no search parameters");
        }

        let reconciled = reconcile(&self.defaults, persisted.as_ref(), link);
        if reconciled.overridden {
            info!("Search state taken from link");
        }
        reconciled
    }

    /// Current request without link parameters
    pub async fn current(&self) -> SearchRequest {
        self.persisted()
            .await
            .unwrap_or_else(|| self.defaults.clone())
    }

    pub async fn save(&self, request: &SearchRequest) -> Result<()> {
        self.store.set(&self.key, request).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.store.remove(&self.key).await
    }
}
