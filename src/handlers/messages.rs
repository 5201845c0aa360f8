use teloxide::prelude::*;
use std::error::Error;

use crate::bot_state::BotState;
use crate::dialog::{self, DialogEvent};
use crate::handlers::utils::send_dialog_event;

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Я понимаю только текст. Подсказки: /help.")
            .await?;
        return Ok(());
    };

    // Пропускаем команды - известные уже обработаны в command_handler
    if text.starts_with('/') {
        return Ok(());
    }

    let Some(user_id) = msg.from.as_ref().map(|user| user.id) else {
        return Ok(());
    };

    let event = state
        .update_session(user_id, |session| dialog::handle_text(session, text))
        .await;

    match &event {
        DialogEvent::ProfileSaved(profile) => log::info!(
            "✅ Profile saved for user {}: rate {:.2} {}/h",
            user_id,
            profile.hourly_rate(),
            profile.currency()
        ),
        DialogEvent::Evaluated(report) => log::info!(
            "📊 User {} evaluated a purchase: {:.2} h",
            user_id,
            report.cost.hours_needed
        ),
        other => log::debug!("💬 Dialog event for user {}: {:?}", user_id, other),
    }

    send_dialog_event(&bot, msg.chat.id, &event).await?;
    Ok(())
}
