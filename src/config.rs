use std::env;
use std::time::Duration;

const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
const TELOXIDE_TOKEN_ENV: &str = "TELOXIDE_TOKEN";
const SESSION_IDLE_TTL_ENV: &str = "SESSION_IDLE_TTL_SECS";
const SESSION_SWEEP_INTERVAL_ENV: &str = "SESSION_SWEEP_INTERVAL_SECS";
const MAX_REMINDERS_ENV: &str = "MAX_REMINDERS_PER_CHAT";

const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub session_idle_ttl: Duration,
    pub sweep_interval: Duration,
    /// None: без ограничения
    pub max_reminders_per_chat: Option<usize>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    MissingToken,
    InvalidNumber { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingToken => write!(
                f,
                "{} is not set. Put the BotFather token into the environment or a .env file",
                TOKEN_ENV
            ),
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{} must be a non-negative integer, got {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(TOKEN_ENV)
            .or_else(|| lookup(TELOXIDE_TOKEN_ENV))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let session_idle_ttl = read_number(&lookup, SESSION_IDLE_TTL_ENV)?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SESSION_IDLE_TTL);

        let sweep_interval = read_number(&lookup, SESSION_SWEEP_INTERVAL_ENV)?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SWEEP_INTERVAL);

        let max_reminders_per_chat = read_number(&lookup, MAX_REMINDERS_ENV)?
            .filter(|max| *max > 0)
            .map(|max| max as usize);

        Ok(Config {
            token,
            session_idle_ttl,
            sweep_interval,
            max_reminders_per_chat,
        })
    }
}

fn read_number(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
