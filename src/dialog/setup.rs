use crate::dialog::flow::Flow;
use crate::models::profile::{normalize_currency, UserProfile};
use crate::parsing::parse_positive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    Income,
    Hours,
    Currency,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetupDraft {
    pub monthly_income: Option<f64>,
    pub hours_per_week: Option<f64>,
    pub currency: Option<String>,
}

impl SetupDraft {
    pub fn into_profile(self) -> Option<UserProfile> {
        Some(UserProfile::new(
            self.monthly_income?,
            self.hours_per_week?,
            self.currency?,
        ))
    }
}

/// Настройка профиля: доход -> часы -> валюта.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupFlow;

impl Flow for SetupFlow {
    type Step = SetupStep;
    type Draft = SetupDraft;

    const FIRST: SetupStep = SetupStep::Income;

    fn accept(step: SetupStep, draft: &SetupDraft, input: &str) -> Option<SetupDraft> {
        let mut draft = draft.clone();
        match step {
            SetupStep::Income => draft.monthly_income = Some(parse_positive(input)?),
            SetupStep::Hours => draft.hours_per_week = Some(parse_positive(input)?),
            SetupStep::Currency => draft.currency = Some(normalize_currency(input)),
        }
        Some(draft)
    }

    fn next(step: SetupStep) -> Option<SetupStep> {
        match step {
            SetupStep::Income => Some(SetupStep::Hours),
            SetupStep::Hours => Some(SetupStep::Currency),
            SetupStep::Currency => None,
        }
    }
}
