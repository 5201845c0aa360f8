use std::error::Error;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};

use crate::dialog::{DialogEvent, EvaluateStep, Report, SetupStep, Step};
use crate::models::{Choice, PurchaseEvaluation, ReminderTask, UserProfile, REMINDER_CHOICES};

/// Экранирование MarkdownV2
pub fn escape_markdown_v2(text: &str) -> String {
    let specials = ['\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!'];
    let mut out = String::with_capacity(text.len() * 2);

    for ch in text.chars() {
        if specials.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Сумма с разделением тысяч пробелами: `1 234 567.89 RUB`
pub fn format_money(amount: f64, currency: &str) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{} {}", sign, grouped, frac_part, currency)
}

/// Длительность в часах и минутах, отрицательная считается нулём.
pub fn format_duration(hours: f64) -> String {
    let total_minutes = (hours * 60.0).max(0.0) as u64;
    let hrs = total_minutes / 60;
    let mins = total_minutes % 60;

    if hrs == 0 {
        format!("{} мин", mins)
    } else if mins == 0 {
        format!("{} ч", hrs)
    } else {
        format!("{} ч {} мин", hrs, mins)
    }
}

pub fn prompt_text(step: Step) -> &'static str {
    match step {
        Step::Setup(SetupStep::Income) => "Какой у вас средний чистый доход в месяц? (например, 120000)",
        Step::Setup(SetupStep::Hours) => "Сколько часов в неделю вы обычно работаете? (например, 38.5)",
        Step::Setup(SetupStep::Currency) => {
            "В какой валюте считать? Напишите код (например, RUB, KZT, USD) или просто название."
        }
        Step::Evaluate(EvaluateStep::Name) => "Какую покупку рассматриваем? Опишите её кратко.",
        Step::Evaluate(EvaluateStep::Price) => "Сколько она стоит? Укажите цену цифрами.",
    }
}

pub fn retry_text(step: Step) -> &'static str {
    match step {
        Step::Setup(SetupStep::Income) => {
            "Не получилось прочитать число. Укажите сумму цифрами, например 95000."
        }
        Step::Setup(SetupStep::Hours) => {
            "Похоже, введено недопустимое значение. Укажите количество часов цифрами."
        }
        Step::Evaluate(EvaluateStep::Name) => "Нужно название или описание покупки.",
        Step::Evaluate(EvaluateStep::Price) => {
            "Не могу обработать цену. Напишите сумму цифрами, например 15999."
        }
        // валюта принимается в любом виде
        Step::Setup(SetupStep::Currency) => prompt_text(step),
    }
}

pub fn profile_text(profile: &UserProfile) -> String {
    format!(
        "📊 *Ваши данные*\n\
        • Доход в месяц: *{}*\n\
        • Часов в неделю: *{}*\n\
        • Почасовая ставка: *{}/ч*",
        escape_markdown_v2(&format_money(profile.monthly_income(), profile.currency())),
        escape_markdown_v2(&format!("{:.2}", profile.hours_per_week())),
        escape_markdown_v2(&format_money(profile.hourly_rate(), profile.currency())),
    )
}

pub fn report_text(report: &Report) -> String {
    let profile = &report.profile;
    format!(
        "🛍️ *{}*\n\
        💰 Цена: *{}*\n\
        💼 Ваша ставка: *{}/ч*\n\
        ⌛ Нужно работать: *{}*\n\
        📅 Это примерно *{}* рабочих недель при {} ч/нед\\.",
        escape_markdown_v2(&report.purchase.name),
        escape_markdown_v2(&format_money(report.purchase.price, profile.currency())),
        escape_markdown_v2(&format_money(profile.hourly_rate(), profile.currency())),
        escape_markdown_v2(&format_duration(report.cost.hours_needed)),
        escape_markdown_v2(&format!("{:.2}", report.cost.weeks_equivalent)),
        escape_markdown_v2(&format!("{:.2}", profile.hours_per_week())),
    )
}

/// Текст, который придёт по таймеру.
pub fn reminder_text(purchase: &PurchaseEvaluation, currency: &str) -> String {
    format!(
        "⏰ Напоминание: вы собирались решить, покупать ли «{}» за {}.",
        purchase.name,
        format_money(purchase.price, currency)
    )
}

/// Таймеры напоминаний и отказ от покупки
pub fn decision_keyboard() -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = REMINDER_CHOICES
        .iter()
        .map(|(label, seconds)| {
            vec![InlineKeyboardButton::callback(
                *label,
                Choice::Remind(*seconds).to_string(),
            )]
        })
        .collect();

    keyboard.push(vec![InlineKeyboardButton::callback(
        "🔕 Не напоминать",
        Choice::SkipReminder.to_string(),
    )]);
    keyboard.push(vec![InlineKeyboardButton::callback(
        "🚫 Отказаться",
        Choice::Reject.to_string(),
    )]);

    InlineKeyboardMarkup::new(keyboard)
}

/// Сколько напоминаний показывать в списке и кнопках.
pub const REMINDERS_LISTED: usize = 10;

/// Telegram не принимает сообщения длиннее 4096 символов.
const REMINDER_PREVIEW_CHARS: usize = 200;

fn preview(text: &str) -> String {
    if text.chars().count() <= REMINDER_PREVIEW_CHARS {
        return text.to_string();
    }
    let mut short: String = text.chars().take(REMINDER_PREVIEW_CHARS - 1).collect();
    short.push('…');
    short
}

pub fn reminders_text(tasks: &[ReminderTask]) -> String {
    if tasks.is_empty() {
        return "Активных напоминаний нет.".to_string();
    }

    let mut text = String::from("⏰ Активные напоминания:\n");
    for task in tasks.iter().take(REMINDERS_LISTED) {
        text.push_str(&format!(
            "\n• {} UTC\n{}\n",
            task.due_at.format("%d.%m %H:%M"),
            preview(&task.message)
        ));
    }

    if tasks.len() > REMINDERS_LISTED {
        text.push_str(&format!("\n…и ещё {}", tasks.len() - REMINDERS_LISTED));
    }
    text
}

/// Список после нажатия "❌": если таймер уже сработал, об этом нужно сказать.
pub fn reminders_text_after_cancel(tasks: &[ReminderTask], cancelled: bool) -> String {
    let list = reminders_text(tasks);
    if cancelled {
        list
    } else {
        format!("Это напоминание уже сработало или снято.\n\n{}", list)
    }
}

pub fn reminders_keyboard(tasks: &[ReminderTask]) -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = tasks
        .iter()
        .take(REMINDERS_LISTED)
        .map(|task| {
            vec![InlineKeyboardButton::callback(
                format!("❌ {} UTC", task.due_at.format("%d.%m %H:%M")),
                Choice::CancelReminder(task.id).to_string(),
            )]
        })
        .collect();

    if !tasks.is_empty() {
        keyboard.push(vec![InlineKeyboardButton::callback(
            "🧹 Снять все",
            Choice::ClearReminders.to_string(),
        )]);
    }

    InlineKeyboardMarkup::new(keyboard)
}

/// Отправка ответа диалога
pub async fn send_dialog_event(
    bot: &Bot,
    chat_id: ChatId,
    event: &DialogEvent,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match event {
        DialogEvent::Prompt(step) => {
            bot.send_message(chat_id, prompt_text(*step)).await?;
        }
        DialogEvent::Retry(step) => {
            bot.send_message(chat_id, retry_text(*step)).await?;
        }
        DialogEvent::ProfileSaved(profile) => {
            bot.send_message(
                chat_id,
                format!(
                    "Готово! Вы зарабатываете примерно {} в час.\n\
                    Теперь можно перейти к /evaluate, чтобы проверить покупку.",
                    format_money(profile.hourly_rate(), profile.currency())
                ),
            )
            .await?;
        }
        DialogEvent::Evaluated(report) => {
            bot.send_message(chat_id, report_text(report))
                .parse_mode(ParseMode::MarkdownV2)
                .await?;

            bot.send_message(
                chat_id,
                "🤔 *Отложим решение или сразу откажемся?*\n\
                Выберите таймер напоминания или жмите «Отказаться»\\.",
            )
            .parse_mode(ParseMode::MarkdownV2)
            .reply_markup(decision_keyboard())
            .await?;
        }
        DialogEvent::Cancelled => {
            bot.send_message(chat_id, "↩️ Диалог завершён. Можно начать заново нужной командой.")
                .await?;
        }
        DialogEvent::NothingToCancel => {
            bot.send_message(chat_id, "Сейчас нет активного диалога.").await?;
        }
        DialogEvent::ProfileMissing => {
            bot.send_message(
                chat_id,
                "Сначала выполните /setup_profile, чтобы я понимал ваш доход.",
            )
            .await?;
        }
        DialogEvent::RateUnavailable => {
            bot.send_message(
                chat_id,
                "Сначала настройте корректные данные о доходе через /setup_profile.",
            )
            .await?;
        }
        DialogEvent::Idle => {
            bot.send_message(
                chat_id,
                "👋 Чтобы начать, наберите /setup_profile или /evaluate. Подсказки: /help.",
            )
            .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::CostInTime;

    #[test]
    fn money_is_grouped_by_thousands() {
        assert_eq!(format_money(15_999.0, "RUB"), "15 999.00 RUB");
        assert_eq!(format_money(1_234_567.891, "USD"), "1 234 567.89 USD");
        assert_eq!(format_money(692.840_6, "RUB"), "692.84 RUB");
        assert_eq!(format_money(0.0, "KZT"), "0.00 KZT");
        assert_eq!(format_money(-1500.0, "RUB"), "-1 500.00 RUB");
        assert_eq!(format_money(999.999, "RUB"), "1 000.00 RUB");
    }

    #[test]
    fn duration_in_hours_and_minutes() {
        assert_eq!(format_duration(23.09), "23 ч 5 мин");
        assert_eq!(format_duration(2.0), "2 ч");
        assert_eq!(format_duration(0.5), "30 мин");
        assert_eq!(format_duration(0.0), "0 мин");
        assert_eq!(format_duration(-3.0), "0 мин");
    }

    #[test]
    fn escapes_markdown_specials() {
        assert_eq!(escape_markdown_v2("1 500.00 RUB"), "1 500\\.00 RUB");
        assert_eq!(escape_markdown_v2("(a-b)!"), "\\(a\\-b\\)\\!");
        assert_eq!(escape_markdown_v2("a\\"), "a\\\\");
    }

    #[test]
    fn trailing_backslash_does_not_break_bold() {
        let report = Report {
            purchase: PurchaseEvaluation {
                name: "Lego\\".to_string(),
                price: 100.0,
            },
            profile: UserProfile::new(120_000.0, 40.0, "RUB"),
            cost: CostInTime {
                hours_needed: 0.14,
                weeks_equivalent: 0.0036,
            },
        };
        assert!(report_text(&report).starts_with("🛍️ *Lego\\\\*\n"));
    }

    fn reminder(name: &str) -> ReminderTask {
        ReminderTask::new(
            ChatId(1),
            std::time::Duration::from_secs(1800),
            reminder_text(
                &PurchaseEvaluation {
                    name: name.to_string(),
                    price: 1_234_567.0,
                },
                "RUB",
            ),
        )
    }

    #[test]
    fn long_reminder_list_fits_one_message() {
        let tasks: Vec<ReminderTask> = (0..200).map(|_| reminder(&"я".repeat(3000))).collect();

        let text = reminders_text(&tasks);
        assert!(text.chars().count() <= 4096);
        assert!(text.ends_with(&format!("…и ещё {}", 200 - REMINDERS_LISTED)));

        let keyboard = reminders_keyboard(&tasks);
        assert_eq!(keyboard.inline_keyboard.len(), REMINDERS_LISTED + 1);
    }

    #[test]
    fn single_reminder_still_offers_clear_all() {
        let tasks = vec![reminder("Наушники")];

        assert!(reminders_text(&tasks).contains("«Наушники»"));
        let keyboard = reminders_keyboard(&tasks);
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert!(reminders_keyboard(&[]).inline_keyboard.is_empty());
    }

    #[test]
    fn late_cancel_explains_missing_reminder() {
        let tasks = vec![reminder("Наушники")];

        assert_eq!(reminders_text_after_cancel(&tasks, true), reminders_text(&tasks));
        assert_eq!(
            reminders_text_after_cancel(&[], false),
            "Это напоминание уже сработало или снято.\n\nАктивных напоминаний нет."
        );
    }

    #[test]
    fn report_escapes_user_input() {
        let report = Report {
            purchase: PurchaseEvaluation {
                name: "Lego *Star* Wars".to_string(),
                price: 15_999.0,
            },
            profile: UserProfile::new(120_000.0, 40.0, "RUB"),
            cost: CostInTime {
                hours_needed: 23.09,
                weeks_equivalent: 0.577,
            },
        };

        let text = report_text(&report);
        assert!(text.contains("Lego \\*Star\\* Wars"));
        assert!(text.contains("15 999\\.00 RUB"));
        assert!(text.contains("23 ч 5 мин"));
        assert!(text.contains("0\\.58"));
    }

    #[test]
    fn reminder_mentions_purchase_and_price() {
        let purchase = PurchaseEvaluation {
            name: "Наушники".to_string(),
            price: 15_999.0,
        };
        assert_eq!(
            reminder_text(&purchase, "RUB"),
            "⏰ Напоминание: вы собирались решить, покупать ли «Наушники» за 15 999.00 RUB."
        );
    }

    #[test]
    fn decision_keyboard_uses_known_tokens() {
        let keyboard = decision_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), REMINDER_CHOICES.len() + 2);
    }

    #[test]
    fn every_step_has_texts() {
        for step in [
            Step::Setup(SetupStep::Income),
            Step::Setup(SetupStep::Hours),
            Step::Setup(SetupStep::Currency),
            Step::Evaluate(EvaluateStep::Name),
            Step::Evaluate(EvaluateStep::Price),
        ] {
            assert!(!prompt_text(step).is_empty());
            assert!(!retry_text(step).is_empty());
        }
    }
}
