use std::time::Duration;

use chrono::{DateTime, Utc};
use teloxide::types::ChatId;
use uuid::Uuid;

/// Взведённое одноразовое напоминание.
#[derive(Debug, Clone)]
pub struct ReminderTask {
    pub id: Uuid,
    pub chat_id: ChatId,
    pub delay: Duration,
    pub message: String,
    pub due_at: DateTime<Utc>,
}

impl ReminderTask {
    pub fn new(chat_id: ChatId, delay: Duration, message: String) -> Self {
        let now = Utc::now();
        let due_at = chrono::Duration::from_std(delay)
            .ok()
            .and_then(|delay| now.checked_add_signed(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            id: Uuid::new_v4(),
            chat_id,
            delay,
            message,
            due_at,
        }
    }
}
