use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::{interval, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::session::Session;

struct Slot {
    session: Session,
    touched: Instant,
}

/// In-memory sessions keyed by id.
///
/// Every user action takes the write lock for its whole duration, so a session
/// is only ever observed or mutated by one action at a time. Sessions nobody
/// has touched for `idle_timeout` are dropped by `evict_idle`.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Slot>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Opens a new session and runs `f` on it before it becomes visible.
    pub async fn create<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        let session = Session::new();
        let result = f(&session);
        let id = session.id();
        let slot = Slot {
            session,
            touched: Instant::now(),
        };
        self.sessions.write().await.insert(id, slot);
        info!(session = %id, "session opened");
        result
    }

    /// Runs a read-only action. `None` when the session does not exist.
    pub async fn read<R>(&self, id: Uuid, f: impl FnOnce(&Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(&id)?;
        slot.touched = Instant::now();
        Some(f(&slot.session))
    }

    /// Runs a mutating action. `None` when the session does not exist.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(&id)?;
        slot.touched = Instant::now();
        Some(f(&mut slot.session))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session = %id, "session closed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for at least `idle_timeout`. Returns how many
    /// were dropped.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, slot| {
            let keep = now.duration_since(slot.touched) < self.idle_timeout;
            if !keep {
                debug!(session = %id, "evicting idle session");
            }
            keep
        });
        before - sessions.len()
    }

    /// Runs `evict_idle` every `every` until the process exits.
    ///
    /// Call inside `tokio::spawn`.
    pub async fn run_sweeper(self: Arc<Self>, every: Duration) {
        let mut timer = interval(every);
        // Skip the first immediate tick
        timer.tick().await;

        info!(
            idle_timeout_secs = self.idle_timeout.as_secs(),
            sweep_every_secs = every.as_secs(),
            "session sweeper started"
        );

        loop {
            timer.tick().await;
            let evicted = self.evict_idle().await;
            if evicted > 0 {
                let remaining = self.len().await;
                info!(evicted, remaining, "idle sessions evicted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::{Category, EntryId};

    const IDLE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new(IDLE);
        let a = registry.create(Session::id).await;
        let b = registry.create(Session::id).await;

        let added = registry
            .update(a, |s| {
                s.add_entry(Category::Employment);
                s.add_entry(Category::Employment)
            })
            .await;
        assert_eq!(added, Some(Some(EntryId(3))));

        let next_in_b = registry
            .update(b, |s| s.add_entry(Category::Employment))
            .await;
        assert_eq!(next_in_b, Some(Some(EntryId(2))));
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_missing_session_yields_none() {
        let registry = SessionRegistry::new(IDLE);
        assert!(registry.read(Uuid::new_v4(), |_| ()).await.is_none());
        assert!(!registry.remove(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn test_remove_discards_session() {
        let registry = SessionRegistry::new(IDLE);
        let id = registry.create(Session::id).await;
        assert!(registry.remove(id).await);
        assert!(registry.update(id, |_| ()).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_is_evicted() {
        let registry = SessionRegistry::new(IDLE);
        let idle = registry.create(Session::id).await;
        let busy = registry.create(Session::id).await;

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(registry.read(busy, |_| ()).await.is_some());
        assert_eq!(registry.evict_idle().await, 0);

        tokio::time::advance(Duration::from_secs(20)).await;
        assert_eq!(registry.evict_idle().await, 1);
        assert!(registry.read(idle, |_| ()).await.is_none());
        assert!(registry.read(busy, |_| ()).await.is_some());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_in_background() {
        let registry = Arc::new(SessionRegistry::new(IDLE));
        let id = registry.create(Session::id).await;
        tokio::spawn(registry.clone().run_sweeper(Duration::from_secs(10)));

        tokio::time::sleep(Duration::from_secs(75)).await;
        assert!(registry.read(id, |_| ()).await.is_none());
    }
}
