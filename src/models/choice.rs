use std::fmt;

use uuid::Uuid;

/// Варианты таймера, которые предлагаются после расчёта.
pub const REMINDER_CHOICES: [(&str, u64); 5] = [
    ("30 минут", 30 * 60),
    ("1 час", 60 * 60),
    ("2 часа", 2 * 60 * 60),
    ("8 часов", 8 * 60 * 60),
    ("24 часа", 24 * 60 * 60),
];

/// Данные inline-кнопки в формате `namespace:payload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Remind(u64),
    SkipReminder,
    Reject,
    CancelReminder(Uuid),
    ClearReminders,
    /// `reminder:` с непонятной задержкой
    BrokenReminder(String),
    Unrecognized(String),
}

impl Choice {
    pub fn parse(data: &str) -> Self {
        let Some((namespace, payload)) = data.split_once(':') else {
            return Choice::Unrecognized(data.to_string());
        };

        match (namespace, payload) {
            ("reminder", "skip") => Choice::SkipReminder,
            ("reminder", seconds) => match seconds.parse::<u64>() {
                Ok(seconds) => Choice::Remind(seconds),
                Err(_) => Choice::BrokenReminder(seconds.to_string()),
            },
            ("decision", "reject") => Choice::Reject,
            ("reminders", "clear") => Choice::ClearReminders,
            ("reminders", payload) => payload
                .strip_prefix("cancel:")
                .and_then(|id| Uuid::parse_str(id).ok())
                .map(Choice::CancelReminder)
                .unwrap_or_else(|| Choice::Unrecognized(data.to_string())),
            _ => Choice::Unrecognized(data.to_string()),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Remind(seconds) => write!(f, "reminder:{}", seconds),
            Choice::SkipReminder => write!(f, "reminder:skip"),
            Choice::Reject => write!(f, "decision:reject"),
            Choice::CancelReminder(id) => write!(f, "reminders:cancel:{}", id),
            Choice::ClearReminders => write!(f, "reminders:clear"),
            Choice::BrokenReminder(payload) => write!(f, "reminder:{}", payload),
            Choice::Unrecognized(data) => write!(f, "{}", data),
        }
    }
}
