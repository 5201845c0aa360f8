use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use tokio::sync::{oneshot, Mutex};
use uuid::Uuid;

use crate::models::ReminderTask;

pub type DeliveryError = Box<dyn Error + Send + Sync>;

/// Куда доставляются сработавшие напоминания.
#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn deliver(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError>;
}

#[async_trait]
impl ReminderSink for Bot {
    async fn deliver(&self, chat_id: ChatId, text: &str) -> Result<(), DeliveryError> {
        self.send_message(chat_id, text).await?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SchedulerError {
    LimitReached(usize),
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::LimitReached(max) => {
                write!(f, "Too many pending reminders in chat (max {})", max)
            }
        }
    }
}

impl Error for SchedulerError {}

struct ArmedReminder {
    task: ReminderTask,
    cancel: oneshot::Sender<()>,
}

type Registry = Arc<Mutex<HashMap<ChatId, HashMap<Uuid, ArmedReminder>>>>;

/// Одноразовые отложенные напоминания в памяти, сгруппированные по чатам.
///
/// Каждое напоминание живёт в отдельной задаче tokio и ждёт либо истечения
/// задержки, либо сигнала отмены. После срабатывания задача сама удаляет
/// себя из реестра, даже если доставка не удалась. Повторов нет.
#[derive(Clone)]
pub struct ReminderScheduler {
    registry: Registry,
    sink: Arc<dyn ReminderSink>,
    max_per_chat: Option<usize>,
}

impl ReminderScheduler {
    pub fn new(sink: Arc<dyn ReminderSink>, max_per_chat: Option<usize>) -> Self {
        Self {
            registry: Arc::new(Mutex::new(HashMap::new())),
            sink,
            max_per_chat: max_per_chat.filter(|max| *max > 0),
        }
    }

    pub async fn schedule(
        &self,
        chat_id: ChatId,
        delay: Duration,
        message: String,
    ) -> Result<ReminderTask, SchedulerError> {
        let task = ReminderTask::new(chat_id, delay, message);
        let (cancel_tx, cancel_rx) = oneshot::channel();

        {
            let mut registry = self.registry.lock().await;
            let armed = registry.entry(chat_id).or_default();
            if let Some(max) = self.max_per_chat {
                if armed.len() >= max {
                    log::warn!("⚠️ Reminder limit ({}) reached for chat {}", max, chat_id);
                    return Err(SchedulerError::LimitReached(max));
                }
            }
            armed.insert(
                task.id,
                ArmedReminder {
                    task: task.clone(),
                    cancel: cancel_tx,
                },
            );
        }

        let registry = self.registry.clone();
        let sink = self.sink.clone();
        let timer = task.clone();
        tokio::spawn(async move {
            run_timer(registry, sink, timer, cancel_rx).await;
        });

        log::info!(
            "⏰ Reminder {} armed for chat {} in {:?}",
            task.id,
            chat_id,
            delay
        );

        Ok(task)
    }

    /// Взведённые напоминания чата, ближайшие первыми.
    pub async fn pending(&self, chat_id: ChatId) -> Vec<ReminderTask> {
        let registry = self.registry.lock().await;
        let mut tasks: Vec<ReminderTask> = registry
            .get(&chat_id)
            .map(|armed| armed.values().map(|reminder| reminder.task.clone()).collect())
            .unwrap_or_default();
        tasks.sort_by_key(|task| task.due_at);
        tasks
    }

    pub async fn cancel(&self, chat_id: ChatId, id: Uuid) -> bool {
        let removed = {
            let mut registry = self.registry.lock().await;
            let removed = registry.get_mut(&chat_id).and_then(|armed| armed.remove(&id));
            if registry.get(&chat_id).is_some_and(|armed| armed.is_empty()) {
                registry.remove(&chat_id);
            }
            removed
        };

        match removed {
            Some(reminder) => {
                let _ = reminder.cancel.send(());
                log::info!("🔕 Reminder {} cancelled in chat {}", id, chat_id);
                true
            }
            None => false,
        }
    }

    pub async fn cancel_all(&self, chat_id: ChatId) -> usize {
        let removed = self.registry.lock().await.remove(&chat_id).unwrap_or_default();
        let count = removed.len();

        for reminder in removed.into_values() {
            let _ = reminder.cancel.send(());
        }

        if count > 0 {
            log::info!("🔕 {} reminder(s) cancelled in chat {}", count, chat_id);
        }
        count
    }
}

async fn run_timer(
    registry: Registry,
    sink: Arc<dyn ReminderSink>,
    task: ReminderTask,
    cancel: oneshot::Receiver<()>,
) {
    tokio::select! {
        _ = tokio::time::sleep(task.delay) => {}
        // отправитель исчез вместе с записью в реестре, это тоже отмена
        _ = cancel => return,
    }

    match sink.deliver(task.chat_id, &task.message).await {
        Ok(()) => log::info!("🔔 Reminder {} delivered to chat {}", task.id, task.chat_id),
        Err(e) => log::error!(
            "❌ Failed to deliver reminder {} to chat {}: {}",
            task.id,
            task.chat_id,
            e
        ),
    }

    let mut registry = registry.lock().await;
    if let Some(armed) = registry.get_mut(&task.chat_id) {
        armed.remove(&task.id);
        if armed.is_empty() {
            registry.remove(&task.chat_id);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FailingSink, RecordingSink};
    use super::*;

    const CHAT: ChatId = ChatId(42);

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_delay_and_forgets_task() {
        let sink = Arc::new(RecordingSink::default());
        let scheduler = ReminderScheduler::new(sink.clone(), None);

        scheduler
            .schedule(CHAT, Duration::from_secs(1800), "купить наушники?".to_string())
            .await
            .unwrap();
        assert_eq!(scheduler.pending(CHAT).await.len(), 1);

        tokio::time::sleep(Duration::from_secs(1799)).await;
        settle().await;
        assert!(sink.sent().await.is_empty());
        assert_eq!(scheduler.pending(CHAT).await.len(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(sink.sent().await, vec![(CHAT, "купить наушники?".to_string())]);
        assert!(scheduler.pending(CHAT).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reminders_are_independent() {
        let sink = Arc::new(RecordingSink::default());
        let scheduler = ReminderScheduler::new(sink.clone(), None);

        scheduler
            .schedule(CHAT, Duration::from_secs(7200), "второе".to_string())
            .await
            .unwrap();
        scheduler
            .schedule(CHAT, Duration::from_secs(3600), "первое".to_string())
            .await
            .unwrap();
        scheduler
            .schedule(ChatId(7), Duration::from_secs(3600), "чужое".to_string())
            .await
            .unwrap();

        let pending = scheduler.pending(CHAT).await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].message, "первое");

        tokio::time::sleep(Duration::from_secs(3601)).await;
        settle().await;
        assert_eq!(scheduler.pending(CHAT).await.len(), 1);
        assert!(scheduler.pending(ChatId(7)).await.is_empty());

        tokio::time::sleep(Duration::from_secs(3600)).await;
        settle().await;
        let sent = sink.sent().await;
        assert_eq!(sent.len(), 3);
        assert_eq!(sent.last().unwrap(), &(CHAT, "второе".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_delivery_still_removes_task() {
        let scheduler = ReminderScheduler::new(Arc::new(FailingSink), None);

        scheduler
            .schedule(CHAT, Duration::from_secs(60), "напоминание".to_string())
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(61)).await;
        settle().await;
        assert!(scheduler.pending(CHAT).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reminder_never_fires() {
        let sink = Arc::new(RecordingSink::default());
        let scheduler = ReminderScheduler::new(sink.clone(), None);

        let task = scheduler
            .schedule(CHAT, Duration::from_secs(60), "отменено".to_string())
            .await
            .unwrap();
        scheduler
            .schedule(CHAT, Duration::from_secs(120), "останется".to_string())
            .await
            .unwrap();

        assert!(scheduler.cancel(CHAT, task.id).await);
        assert!(!scheduler.cancel(CHAT, task.id).await);

        tokio::time::sleep(Duration::from_secs(121)).await;
        settle().await;
        assert_eq!(sink.sent().await, vec![(CHAT, "останется".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_clears_chat() {
        let sink = Arc::new(RecordingSink::default());
        let scheduler = ReminderScheduler::new(sink.clone(), None);

        for minutes in [30, 60, 120] {
            scheduler
                .schedule(CHAT, Duration::from_secs(minutes * 60), "x".to_string())
                .await
                .unwrap();
        }

        assert_eq!(scheduler.cancel_all(CHAT).await, 3);
        assert_eq!(scheduler.cancel_all(CHAT).await, 0);

        tokio::time::sleep(Duration::from_secs(3 * 3600)).await;
        settle().await;
        assert!(sink.sent().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn limit_applies_per_chat() {
        let scheduler = ReminderScheduler::new(Arc::new(RecordingSink::default()), Some(2));

        for _ in 0..2 {
            scheduler
                .schedule(CHAT, Duration::from_secs(60), "x".to_string())
                .await
                .unwrap();
        }

        let err = scheduler
            .schedule(CHAT, Duration::from_secs(60), "x".to_string())
            .await
            .unwrap_err();
        assert_eq!(err, SchedulerError::LimitReached(2));
        assert!(scheduler
            .schedule(ChatId(7), Duration::from_secs(60), "x".to_string())
            .await
            .is_ok());

        tokio::time::sleep(Duration::from_secs(61)).await;
        settle().await;
        assert!(scheduler
            .schedule(CHAT, Duration::from_secs(60), "x".to_string())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn zero_limit_means_unbounded() {
        let scheduler = ReminderScheduler::new(Arc::new(RecordingSink::default()), Some(0));
        for _ in 0..50 {
            scheduler
                .schedule(CHAT, Duration::from_secs(3600), "x".to_string())
                .await
                .unwrap();
        }
        assert_eq!(scheduler.pending(CHAT).await.len(), 50);
        scheduler.cancel_all(CHAT).await;
    }
}
