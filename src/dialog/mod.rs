//! Диалоги настройки профиля и оценки покупки.
//!
//! Все функции работают с сессией одного пользователя и возвращают
//! [`DialogEvent`], который обработчики превращают в текст для Telegram.

pub mod evaluate;
pub mod flow;
pub mod setup;

pub use evaluate::{EvaluateFlow, EvaluateStep, PurchaseDraft};
pub use flow::{Conversation, Feed, Flow};
pub use setup::{SetupDraft, SetupFlow, SetupStep};

use crate::evaluation::{self, CostInTime};
use crate::models::{ActiveConversation, PurchaseEvaluation, Session, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Setup(SetupStep),
    Evaluate(EvaluateStep),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub purchase: PurchaseEvaluation,
    pub profile: UserProfile,
    pub cost: CostInTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    /// следующий вопрос
    Prompt(Step),
    /// ввод не принят, вопрос повторяется
    Retry(Step),
    ProfileSaved(UserProfile),
    Evaluated(Report),
    Cancelled,
    NothingToCancel,
    /// оценка без сохранённого профиля
    ProfileMissing,
    /// ставка не положительная, посчитать нельзя
    RateUnavailable,
    /// текст вне диалога
    Idle,
}

pub fn start_setup(session: &mut Session) -> DialogEvent {
    session.conversation = ActiveConversation::Setup(Conversation::start());
    DialogEvent::Prompt(Step::Setup(SetupFlow::FIRST))
}

pub fn start_evaluation(session: &mut Session) -> DialogEvent {
    if session.profile.is_none() {
        session.conversation = ActiveConversation::Idle;
        return DialogEvent::ProfileMissing;
    }

    session.conversation = ActiveConversation::Evaluate(Conversation::start());
    DialogEvent::Prompt(Step::Evaluate(EvaluateFlow::FIRST))
}

pub fn cancel(session: &mut Session) -> DialogEvent {
    if session.conversation.is_idle() {
        return DialogEvent::NothingToCancel;
    }
    session.conversation = ActiveConversation::Idle;
    DialogEvent::Cancelled
}

pub fn handle_text(session: &mut Session, text: &str) -> DialogEvent {
    match std::mem::take(&mut session.conversation) {
        ActiveConversation::Idle => DialogEvent::Idle,
        ActiveConversation::Setup(mut conversation) => match conversation.feed(text) {
            Feed::Retry(step) => {
                session.conversation = ActiveConversation::Setup(conversation);
                DialogEvent::Retry(Step::Setup(step))
            }
            Feed::Next(step) => {
                session.conversation = ActiveConversation::Setup(conversation);
                DialogEvent::Prompt(Step::Setup(step))
            }
            Feed::Complete(draft) => finish_setup(session, draft),
        },
        ActiveConversation::Evaluate(mut conversation) => match conversation.feed(text) {
            Feed::Retry(step) => {
                session.conversation = ActiveConversation::Evaluate(conversation);
                DialogEvent::Retry(Step::Evaluate(step))
            }
            Feed::Next(step) => {
                session.conversation = ActiveConversation::Evaluate(conversation);
                DialogEvent::Prompt(Step::Evaluate(step))
            }
            Feed::Complete(draft) => finish_evaluation(session, draft),
        },
    }
}

fn finish_setup(session: &mut Session, draft: SetupDraft) -> DialogEvent {
    let Some(profile) = draft.into_profile() else {
        log::error!("❌ Setup finished with an incomplete draft");
        return DialogEvent::Cancelled;
    };

    session.profile = Some(profile.clone());
    DialogEvent::ProfileSaved(profile)
}

fn finish_evaluation(session: &mut Session, draft: PurchaseDraft) -> DialogEvent {
    let Some(profile) = session.profile.clone() else {
        return DialogEvent::ProfileMissing;
    };

    let (Some(name), Some(price)) = (draft.name, draft.price) else {
        log::error!("❌ Evaluation finished with an incomplete draft");
        return DialogEvent::Cancelled;
    };

    if profile.hourly_rate() <= 0.0 {
        return DialogEvent::RateUnavailable;
    }

    let cost = evaluation::evaluate(&profile, price);
    let purchase = PurchaseEvaluation { name, price };
    session.last_purchase = Some(purchase.clone());

    DialogEvent::Evaluated(Report {
        purchase,
        profile,
        cost,
    })
}
