use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use teloxide::types::UserId;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::models::Session;
use crate::reminders::ReminderScheduler;

type SessionCache = Arc<RwLock<HashMap<UserId, (Session, Instant)>>>;

/// Общее состояние бота, которое получает каждый обработчик.
#[derive(Clone)]
pub struct BotState {
    sessions: SessionCache,
    pub reminders: ReminderScheduler,
}

impl BotState {
    pub fn new(reminders: ReminderScheduler) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            reminders,
        }
    }

    /// Меняет сессию пользователя под одной блокировкой.
    /// Сессия создаётся при первом обращении.
    pub async fn update_session<R>(
        &self,
        user_id: UserId,
        f: impl FnOnce(&mut Session) -> R,
    ) -> R {
        let mut sessions = self.sessions.write().await;
        let (session, touched_at) = sessions
            .entry(user_id)
            .or_insert_with(|| {
                log::debug!("🆕 Session created for user {}", user_id);
                (Session::default(), Instant::now())
            });
        *touched_at = Instant::now();
        f(session)
    }

    pub async fn get_session(&self, user_id: UserId) -> Session {
        let sessions = self.sessions.read().await;
        sessions
            .get(&user_id)
            .map(|(session, _)| session.clone())
            .unwrap_or_default()
    }

    /// Удаляет сессии, к которым не обращались дольше `ttl`.
    pub async fn cleanup_sessions(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let previous_count = sessions.len();

        sessions.retain(|_, (_, touched_at)| touched_at.elapsed() < ttl);

        let evicted = previous_count - sessions.len();
        log::debug!(
            "🧹 Sessions cleaned: {} -> {} entries",
            previous_count,
            sessions.len()
        );
        evicted
    }
}
