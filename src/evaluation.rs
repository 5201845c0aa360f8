use crate::models::UserProfile;

/// Стоимость покупки в рабочем времени.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostInTime {
    pub hours_needed: f64,
    pub weeks_equivalent: f64,
}

/// Сколько часов и рабочих недель нужно отработать ради покупки.
/// Вызывающий код обязан проверить, что ставка положительная.
pub fn evaluate(profile: &UserProfile, price: f64) -> CostInTime {
    let hours_needed = price / profile.hourly_rate();
    let weeks_equivalent = if profile.hours_per_week() != 0.0 {
        hours_needed / profile.hours_per_week()
    } else {
        0.0
    };

    CostInTime {
        hours_needed,
        weeks_equivalent,
    }
}
