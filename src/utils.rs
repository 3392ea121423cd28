use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

static WARNED_MESSAGES: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Log a warning the first time a given message is seen in this process.
pub fn warn_once(message: impl Into<String>) {
    let message = message.into();
    let cache = WARNED_MESSAGES.get_or_init(|| Mutex::new(HashSet::new()));

    if let Ok(mut warned) = cache.lock()
        && warned.insert(message.clone())
    {
        tracing::warn!("{message}");
    }
}

#[derive(Debug, Clone)]
pub struct NumberFormatOptions {
    pub use_comma: bool,
    pub use_human: bool,
    pub locale: String,
    pub decimal_places: usize,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self {
            use_comma: false,
            use_human: false,
            locale: "en".to_string(),
            decimal_places: 2,
        }
    }
}

fn locale_for(name: &str) -> Locale {
    match name {
        "de" => Locale::de,
        "fr" => Locale::fr,
        "es" => Locale::es,
        "it" => Locale::it,
        "ja" => Locale::ja,
        "ko" => Locale::ko,
        "zh" => Locale::zh,
        other => {
            if other != "en" {
                warn_once(format!("Unknown locale '{other}', using 'en'"));
            }
            Locale::en
        }
    }
}

/// Format a count for display. Accepts u32, u64 and usize via `TryInto`.
pub fn format_number(n: impl TryInto<u64>, options: &NumberFormatOptions) -> String {
    let n: u64 = n.try_into().unwrap_or(u64::MAX);

    if options.use_human {
        if n >= 1_000_000_000_000 {
            format!(
                "{:.prec$}t",
                n as f64 / 1_000_000_000_000.0,
                prec = options.decimal_places
            )
        } else if n >= 1_000_000_000 {
            format!(
                "{:.prec$}b",
                n as f64 / 1_000_000_000.0,
                prec = options.decimal_places
            )
        } else if n >= 1_000_000 {
            format!(
                "{:.prec$}m",
                n as f64 / 1_000_000.0,
                prec = options.decimal_places
            )
        } else if n >= 1_000 {
            format!(
                "{:.prec$}k",
                n as f64 / 1_000.0,
                prec = options.decimal_places
            )
        } else {
            n.to_string()
        }
    } else if options.use_comma {
        n.to_formatted_string(&locale_for(&options.locale))
    } else {
        n.to_string()
    }
}

/// Format a mean or score with the configured number of decimals.
pub fn format_decimal(value: f64, options: &NumberFormatOptions) -> String {
    format!("{:.prec$}", value, prec = options.decimal_places)
}

/// `42.5` becomes `42.5%` (always one decimal).
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Render a trend key (`YYYY-MM-DD` or `YYYY-MM`) with non-padded month and day.
pub fn format_period_for_display(period: &str) -> String {
    if let Ok(parsed) = NaiveDate::parse_from_str(period, "%Y-%m-%d") {
        return format!("{}/{}/{}", parsed.month(), parsed.day(), parsed.year());
    }

    if let Ok(parsed) = NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d") {
        return format!("{}/{}", parsed.month(), parsed.year());
    }

    period.to_string()
}

#[cfg(test)]
mod tests;
