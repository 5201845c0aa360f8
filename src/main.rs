use std::sync::Arc;

use teloxide::{prelude::*, utils::command::BotCommands};

mod bot_state;
mod config;
mod decision;
mod dialog;
mod evaluation;
mod handlers;
mod models;
mod parsing;
mod reminders;

use crate::bot_state::BotState;
use crate::config::Config;
use crate::handlers::{callback_handler, command_handler, message_handler};
use crate::reminders::ReminderScheduler;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "snake_case", description = "Доступные команды:")]
enum Command {
    #[command(description = "начать работу с ботом")]
    Start,
    #[command(description = "показать помощь")]
    Help,
    #[command(description = "посмотреть сохранённые данные")]
    Profile,
    #[command(description = "указать доход и график")]
    SetupProfile,
    #[command(description = "оценить покупку")]
    Evaluate,
    #[command(description = "выйти из текущего диалога")]
    Cancel,
    #[command(description = "активные напоминания")]
    Reminders,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Загружаем .env и инициализируем логирование
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting labor cost bot...");

    let config = Config::from_env()?;
    let bot = Bot::new(config.token.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("⚠️ Failed to register bot commands: {}", e);
    }

    let reminders = ReminderScheduler::new(Arc::new(bot.clone()), config.max_reminders_per_chat);
    let state = BotState::new(reminders);

    // Фоновая задача для очистки сессий
    let state_clone = state.clone();
    let config_clone = config.clone();
    tokio::spawn(async move {
        handlers::sweep_sessions_task(state_clone, config_clone).await;
    });

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler)
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler));

    log::info!("🚀 Bot started, waiting for updates...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
