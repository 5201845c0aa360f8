use teloxide::prelude::*;
use std::error::Error;

use crate::bot_state::BotState;
use crate::decision::{resolve_choice, ChoiceOutcome};
use crate::handlers::utils::{reminder_text, reminders_keyboard, reminders_text_after_cancel};
use crate::models::Choice;
use crate::reminders::SchedulerError;

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    bot.answer_callback_query(q.id.clone()).await?;

    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();

    let choice = Choice::parse(data);
    let session = state.get_session(q.from.id).await;
    let outcome = resolve_choice(&session, &choice);
    log::debug!("🔘 Button {} from user {}: {:?}", data, q.from.id, outcome);

    let reply = match outcome {
        ChoiceOutcome::Remind {
            delay,
            purchase,
            currency,
        } => {
            let text = reminder_text(&purchase, &currency);
            match state.reminders.schedule(chat_id, delay, text).await {
                Ok(_) => "🔔 Напоминание поставлено! Возвращаюсь к вам позже.".to_string(),
                Err(SchedulerError::LimitReached(max)) => format!(
                    "⚠️ Уже поставлено {} напоминаний. Снимите лишние через /reminders.",
                    max
                ),
            }
        }
        ChoiceOutcome::Skipped => "✅ Решение принято без напоминаний.".to_string(),
        ChoiceOutcome::Rejected(name) => format!(
            "🚫 Вы отказались от {}. Отличное решение, если оно делает вас спокойнее!",
            name.map(|name| format!("«{}»", name))
                .unwrap_or_else(|| "покупки".to_string())
        ),
        ChoiceOutcome::CancelReminder(id) => {
            let cancelled = state.reminders.cancel(chat_id, id).await;
            // перерисовываем список оставшихся
            let tasks = state.reminders.pending(chat_id).await;
            let text = reminders_text_after_cancel(&tasks, cancelled);
            let request = bot.edit_message_text(chat_id, message_id, text);
            if tasks.is_empty() {
                request.await?;
            } else {
                request.reply_markup(reminders_keyboard(&tasks)).await?;
            }
            return Ok(());
        }
        ChoiceOutcome::ClearReminders => match state.reminders.cancel_all(chat_id).await {
            0 => "Активных напоминаний нет.".to_string(),
            count => format!("🧹 Снято напоминаний: {}.", count),
        },
        ChoiceOutcome::Stale => {
            "Нет данных о последней покупке, попробуйте снова через /evaluate.".to_string()
        }
        ChoiceOutcome::BrokenReminder => "Что-то пошло не так с напоминанием.".to_string(),
        ChoiceOutcome::Unrecognized => {
            log::warn!("⚠️ Unrecognized button data {:?} in chat {}", data, chat_id);
            "Команда не распознана. Попробуйте снова через /evaluate.".to_string()
        }
    };

    bot.edit_message_text(chat_id, message_id, reply).await?;
    Ok(())
}
