use teloxide::prelude::*;
use teloxide::types::ParseMode;
use std::error::Error;

use crate::bot_state::BotState;
use crate::dialog::{self, DialogEvent};
use crate::models::Session;
use crate::handlers::utils::{
    profile_text, reminders_keyboard, reminders_text, send_dialog_event,
};

use crate::Command;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cmd {
        Command::Start => handle_start(bot, msg).await?,
        Command::Help => handle_help(bot, msg).await?,
        Command::Profile => handle_profile(bot, msg, state).await?,
        Command::SetupProfile => handle_dialog(bot, msg, state, dialog::start_setup).await?,
        Command::Evaluate => handle_dialog(bot, msg, state, dialog::start_evaluation).await?,
        Command::Cancel => handle_dialog(bot, msg, state, dialog::cancel).await?,
        Command::Reminders => handle_reminders(bot, msg, state).await?,
    }
    Ok(())
}

/// Запуск, перезапуск или отмена диалога
async fn handle_dialog(
    bot: Bot,
    msg: Message,
    state: BotState,
    action: fn(&mut Session) -> DialogEvent,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(user_id) = msg.from.as_ref().map(|user| user.id) else {
        log::debug!("Command without sender in chat {}, ignoring", msg.chat.id);
        return Ok(());
    };

    let event = state.update_session(user_id, action).await;
    log::debug!("🧭 Dialog command from user {}: {:?}", user_id, event);

    send_dialog_event(&bot, msg.chat.id, &event).await?;
    Ok(())
}

async fn handle_start(
    bot: Bot,
    msg: Message,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let start_text = "👋 *Привет\\!*\n\
        Я помогу понять, сколько рабочего времени уйдёт на конкретную покупку\\.\n\n\
        1️⃣ /setup\\_profile – расскажи о доходе и графике\\.\n\
        2️⃣ /evaluate – посчитаем покупку и при необходимости поставим напоминание\\.\n\
        ℹ️ /profile – посмотреть сохранённые данные, /cancel – выйти из любого шага\\.";

    bot.send_message(msg.chat.id, start_text)
        .parse_mode(ParseMode::MarkdownV2)
        .await?;

    Ok(())
}

async fn handle_help(
    bot: Bot,
    msg: Message,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    bot.send_message(
        msg.chat.id,
        "🧭 *Подсказки*\n\
        • */setup\\_profile* – задать доход и график\\.\n\
        • */evaluate* – ввести товар и цену, увидеть расчёты\\.\n\
        • */profile* – напомнить текущую ставку\\.\n\
        • */reminders* – посмотреть и снять напоминания\\.\n\
        • */cancel* – выйти из текущего диалога\\.\n\
        • После расчёта можно выбрать напоминание или отказаться от покупки\\.",
    )
    .parse_mode(ParseMode::MarkdownV2)
    .await?;

    Ok(())
}

async fn handle_profile(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let Some(user_id) = msg.from.as_ref().map(|user| user.id) else {
        return Ok(());
    };
    let session = state.get_session(user_id).await;

    match session.profile {
        Some(profile) => {
            bot.send_message(msg.chat.id, profile_text(&profile))
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        None => {
            bot.send_message(
                msg.chat.id,
                "⚠️ Профиль ещё не настроен. Наберите /setup_profile, чтобы начать.",
            )
            .await?;
        }
    }

    Ok(())
}

async fn handle_reminders(
    bot: Bot,
    msg: Message,
    state: BotState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let tasks = state.reminders.pending(msg.chat.id).await;

    let request = bot.send_message(msg.chat.id, reminders_text(&tasks));
    if tasks.is_empty() {
        request.await?;
    } else {
        request.reply_markup(reminders_keyboard(&tasks)).await?;
    }

    Ok(())
}
