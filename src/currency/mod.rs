use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("EUR")
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            grouping_separator: ',',
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

/// Formats a whole-unit amount such as `€2,505`.
pub fn format_amount(amount: u64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let symbol = symbol_for(code.as_str());
    let body = group_digits(&amount.to_string(), locale.grouping_separator);
    if symbol.chars().count() > 1 {
        format!("{} {}", symbol, body)
    } else {
        format!("{}{}", symbol, body)
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// `Jun 1` style label used in stay summaries.
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{} {}", month_label(date.month()), date.day())
}

/// `Sun, Jun 1, 2025` style label used next to date inputs.
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{}, {} {}, {}",
        date.weekday(),
        month_label(date.month()),
        date.day(),
        date.year()
    )
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
