use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{SessionData, SessionId, SessionStore};

/// Process-local session store. Entries idle for longer than the TTL are
/// treated as absent and dropped on the next write.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    inner: Arc<RwLock<HashMap<SessionId, SessionData>>>,
    ttl: Option<Duration>,
}

impl InMemorySessionStore {
    /// `ttl_secs == 0` keeps sessions for the life of the process
    pub fn new(ttl_secs: u64) -> Self {
        let ttl = if ttl_secs == 0 {
            None
        } else {
            i64::try_from(ttl_secs).ok().and_then(Duration::try_seconds)
        };
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn is_live(&self, data: &SessionData) -> bool {
        match self.ttl {
            Some(ttl) => Utc::now() - data.updated_at <= ttl,
            None => true,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Option<SessionData> {
        let guard = self.inner.read().await;
        guard.get(id).filter(|data| self.is_live(data)).cloned()
    }

    async fn put(&self, id: &SessionId, data: SessionData) {
        let mut guard = self.inner.write().await;
        let before = guard.len();
        guard.retain(|_, existing| self.is_live(existing));
        if guard.len() < before {
            debug!(expired = before - guard.len(), "Pruned expired sessions");
        }
        guard.insert(*id, data);
    }
}
