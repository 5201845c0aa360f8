use crate::dialog::flow::Flow;
use crate::parsing::parse_positive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluateStep {
    Name,
    Price,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseDraft {
    pub name: Option<String>,
    pub price: Option<f64>,
}

/// Оценка покупки: название -> цена.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluateFlow;

impl Flow for EvaluateFlow {
    type Step = EvaluateStep;
    type Draft = PurchaseDraft;

    const FIRST: EvaluateStep = EvaluateStep::Name;

    fn accept(step: EvaluateStep, draft: &PurchaseDraft, input: &str) -> Option<PurchaseDraft> {
        let mut draft = draft.clone();
        match step {
            EvaluateStep::Name => {
                let name = input.trim();
                if name.is_empty() {
                    return None;
                }
                draft.name = Some(name.to_string());
            }
            EvaluateStep::Price => draft.price = Some(parse_positive(input)?),
        }
        Some(draft)
    }

    fn next(step: EvaluateStep) -> Option<EvaluateStep> {
        match step {
            EvaluateStep::Name => Some(EvaluateStep::Price),
            EvaluateStep::Price => None,
        }
    }
}
