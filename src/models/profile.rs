/// Среднее количество недель в месяце.
pub const WEEKS_PER_MONTH: f64 = 4.33;

pub const DEFAULT_CURRENCY: &str = "RUB";

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    monthly_income: f64,
    hours_per_week: f64,
    currency: String,
}

impl UserProfile {
    pub fn new(monthly_income: f64, hours_per_week: f64, currency: impl Into<String>) -> Self {
        Self {
            monthly_income,
            hours_per_week,
            currency: currency.into(),
        }
    }

    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    pub fn hours_per_week(&self) -> f64 {
        self.hours_per_week
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Почасовая ставка. Ноль, если часов в месяце нет.
    pub fn hourly_rate(&self) -> f64 {
        let hours_per_month = self.hours_per_week * WEEKS_PER_MONTH;
        if hours_per_month <= 0.0 {
            return 0.0;
        }
        (self.monthly_income / hours_per_month).max(0.0)
    }
}

/// Оставляет только буквы в верхнем регистре, пустой ввод превращается в RUB.
pub fn normalize_currency(raw: &str) -> String {
    let currency: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_uppercase)
        .collect();

    if currency.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        currency
    }
}
