use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::info;
use uuid::Uuid;

use crate::editor::session::EditorSession;

pub type SharedSession = Arc<Mutex<EditorSession>>;

struct Entry {
    session: SharedSession,
    touched: Instant,
}

/// Mounted editor sessions by id. Removing a session unmounts it; its
/// pending debounced commits are cancelled when the last handle drops.
///
/// Clients that vanish without `DELETE` are reclaimed by [`sweep`]: every
/// lookup refreshes a session's idle clock.
///
/// [`sweep`]: SessionRegistry::sweep
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, session: EditorSession) -> (Uuid, SharedSession) {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        let entry = Entry {
            session: shared.clone(),
            touched: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        (id, shared)
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.touched = Instant::now();
        Some(entry.session.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.write().await.remove(&id).map(|entry| entry.session)
    }

    /// Drops every session untouched for at least `idle`. Returns how many
    /// were dropped.
    pub async fn sweep(&self, idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.touched.elapsed() < idle);
        before - sessions.len()
    }

    /// Sweeps every `every` for as long as the returned task runs.
    pub fn spawn_sweeper(&self, idle: Duration, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let dropped = registry.sweep(idle).await;
                if dropped > 0 {
                    info!(dropped, "Unmounted idle editor sessions");
                }
            }
        })
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::session::{InitialData, SessionSettings};
    use crate::editor::workspace::Mode;
    use crate::render::TemplateKind;

    const IDLE: Duration = Duration::from_secs(60 * 60);

    fn session() -> EditorSession {
        EditorSession::mount(
            Mode::Resume,
            InitialData::default(),
            TemplateKind::Single,
            None,
            None,
            SessionSettings {
                debounce: Duration::from_millis(300),
                notice_ttl: Duration::from_millis(2000),
                download_dir: None,
            },
        )
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let registry = SessionRegistry::default();
        let (id, _) = registry.insert(session()).await;
        assert!(registry.get(id).await.is_some());
        assert_eq!(registry.len().await, 1);

        assert!(registry.remove(id).await.is_some());
        assert!(registry.get(id).await.is_none());
        assert!(registry.remove(id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_drops_only_idle_sessions() {
        let registry = SessionRegistry::default();
        let (active, _) = registry.insert(session()).await;
        let (abandoned, _) = registry.insert(session()).await;

        time::advance(IDLE / 2).await;
        assert!(registry.get(active).await.is_some());
        time::advance(IDLE / 2).await;

        assert_eq!(registry.sweep(IDLE).await, 1);
        assert!(registry.get(active).await.is_some());
        assert!(registry.get(abandoned).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_task_reclaims_abandoned_sessions() {
        let registry = SessionRegistry::default();
        registry.insert(session()).await;
        let sweeper = registry.spawn_sweeper(IDLE, Duration::from_secs(60));

        time::sleep(IDLE + Duration::from_secs(61)).await;
        assert_eq!(registry.len().await, 0);
        sweeper.abort();
    }
}
