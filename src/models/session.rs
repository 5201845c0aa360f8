use crate::dialog::{Conversation, EvaluateFlow, SetupFlow};

use super::{PurchaseEvaluation, UserProfile};

/// Активный диалог пользователя. Одновременно может идти только один.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ActiveConversation {
    #[default]
    Idle,
    Setup(Conversation<SetupFlow>),
    Evaluate(Conversation<EvaluateFlow>),
}

impl ActiveConversation {
    pub fn is_idle(&self) -> bool {
        matches!(self, ActiveConversation::Idle)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub profile: Option<UserProfile>,
    pub last_purchase: Option<PurchaseEvaluation>,
    pub conversation: ActiveConversation,
}
