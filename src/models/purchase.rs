/// Результат завершённой оценки покупки.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseEvaluation {
    pub name: String,
    pub price: f64,
}
