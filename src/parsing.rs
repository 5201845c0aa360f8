/// Достаёт число из произвольного ввода пользователя.
///
/// Пробелы выбрасываются, запятая считается десятичным разделителем.
/// Сбор цифр останавливается на первом чужом символе после числа, поэтому
/// "15999 руб." читается как 15999.
pub fn parse_number(text: &str) -> Option<f64> {
    let mut number = String::new();
    let mut has_decimal = false;

    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        let ch = if ch == ',' { '.' } else { ch };

        if ch.is_ascii_digit() {
            number.push(ch);
        } else if ch == '.' && !has_decimal {
            number.push(ch);
            has_decimal = true;
        } else if !number.is_empty() {
            break;
        }
    }

    if number.is_empty() {
        return None;
    }

    number.parse::<f64>().ok()
}

/// Число строго больше нуля, иначе None.
pub fn parse_positive(text: &str) -> Option<f64> {
    parse_number(text).filter(|value| value.is_finite() && *value > 0.0)
}
