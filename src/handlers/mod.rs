pub mod callbacks;
pub mod commands;
pub mod messages;
pub mod utils;

pub use callbacks::callback_handler;
pub use commands::command_handler;
pub use messages::message_handler;

use tokio::time;
use crate::bot_state::BotState;
use crate::config::Config;

/// Периодически выбрасывает сессии, которые давно не трогали.
pub async fn sweep_sessions_task(state: BotState, config: Config) {
    let mut interval = time::interval(config.sweep_interval);

    loop {
        interval.tick().await;

        let evicted = state.cleanup_sessions(config.session_idle_ttl).await;
        if evicted > 0 {
            log::info!("🧹 Evicted {} idle session(s)", evicted);
        }
    }
}
