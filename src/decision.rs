use std::time::Duration;

use uuid::Uuid;

use crate::models::{Choice, PurchaseEvaluation, Session};

/// Что делать с нажатой кнопкой после расчёта.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceOutcome {
    Remind {
        delay: Duration,
        purchase: PurchaseEvaluation,
        currency: String,
    },
    Skipped,
    /// название последней покупки, если она ещё есть
    Rejected(Option<String>),
    CancelReminder(Uuid),
    ClearReminders,
    /// кнопка осталась от расчёта, которого уже нет
    Stale,
    BrokenReminder,
    Unrecognized,
}

pub fn resolve_choice(session: &Session, choice: &Choice) -> ChoiceOutcome {
    match choice {
        Choice::Remind(seconds) => match (&session.profile, &session.last_purchase) {
            (Some(profile), Some(purchase)) => ChoiceOutcome::Remind {
                delay: Duration::from_secs(*seconds),
                purchase: purchase.clone(),
                currency: profile.currency().to_string(),
            },
            _ => ChoiceOutcome::Stale,
        },
        Choice::SkipReminder => ChoiceOutcome::Skipped,
        Choice::Reject => {
            ChoiceOutcome::Rejected(session.last_purchase.as_ref().map(|p| p.name.clone()))
        }
        Choice::CancelReminder(id) => ChoiceOutcome::CancelReminder(*id),
        Choice::ClearReminders => ChoiceOutcome::ClearReminders,
        Choice::BrokenReminder(_) => ChoiceOutcome::BrokenReminder,
        Choice::Unrecognized(_) => ChoiceOutcome::Unrecognized,
    }
}
