// Cached authorization contexts, keyed by staff id.
//
// The auth middleware resolves granted store ids through this cache so the
// grants table is not hit on every request. Grant mutations invalidate the
// entry for the affected staff member, fire-and-forget.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;

use crate::authz::{StaffId, StoreId};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AuthContextCache: Send + Sync {
    async fn get(&self, staff_id: StaffId) -> Result<Option<Vec<StoreId>>, CacheError>;
    async fn put(&self, staff_id: StaffId, store_ids: Vec<StoreId>) -> Result<(), CacheError>;
    async fn invalidate(&self, staff_id: StaffId) -> Result<(), CacheError>;
}

/// In-process cache of resolved grant sets.
pub struct InMemoryAuthContextCache {
    entries: RwLock<HashMap<StaffId, Vec<StoreId>>>,
}

impl InMemoryAuthContextCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryAuthContextCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthContextCache for InMemoryAuthContextCache {
    async fn get(&self, staff_id: StaffId) -> Result<Option<Vec<StoreId>>, CacheError> {
        Ok(self.entries.read().await.get(&staff_id).cloned())
    }

    async fn put(&self, staff_id: StaffId, store_ids: Vec<StoreId>) -> Result<(), CacheError> {
        self.entries.write().await.insert(staff_id, store_ids);
        Ok(())
    }

    async fn invalidate(&self, staff_id: StaffId) -> Result<(), CacheError> {
        self.entries.write().await.remove(&staff_id);
        Ok(())
    }
}

/// Shared process-wide cache instance.
pub fn shared_cache() -> Arc<InMemoryAuthContextCache> {
    use std::sync::OnceLock;
    static INSTANCE: OnceLock<Arc<InMemoryAuthContextCache>> = OnceLock::new();
    INSTANCE.get_or_init(|| Arc::new(InMemoryAuthContextCache::new())).clone()
}

/// Invalidate the cached authorization context for a staff member without
/// blocking the calling mutation. Failure is logged, never propagated.
pub fn invalidate_actor_context(cache: Arc<dyn AuthContextCache>, staff_id: StaffId) {
    tokio::spawn(async move {
        if let Err(e) = cache.invalidate(staff_id).await {
            warn!("failed to invalidate auth context for staff {}: {}", staff_id, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_invalidate_round_trip() {
        let cache = InMemoryAuthContextCache::new();
        assert_eq!(cache.get(1).await.unwrap(), None);

        cache.put(1, vec![10, 20]).await.unwrap();
        assert_eq!(cache.get(1).await.unwrap(), Some(vec![10, 20]));

        cache.invalidate(1).await.unwrap();
        assert_eq!(cache.get(1).await.unwrap(), None);
    }
}
