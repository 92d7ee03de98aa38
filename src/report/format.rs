//! Value and date formatting for cards, tooltips and axis ticks.
//!
//! Peso and percent values use Chilean grouping (`1.234,56`); US dollar
//! values use US grouping (`1,234.56`). Two decimals everywhere.

use chrono::NaiveDate;

use crate::domain::{Change, UnitFormat};
use crate::domain::calendar::parse_api_date;

/// Format a value for display in the indicator's unit. `None` renders as `N/A`.
pub fn format_value(value: Option<f64>, unit: UnitFormat) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "N/A".to_string();
    };
    match unit {
        UnitFormat::Peso => format!("${}", group_fixed(v, '.', ',')),
        UnitFormat::Dollar => format!("US${}", group_fixed(v, ',', '.')),
        UnitFormat::Percent => format!("{}%", group_fixed(v, '.', ',')),
    }
}

/// Compact axis label: grouping without decimals for large magnitudes.
pub fn format_axis(value: f64, unit: UnitFormat) -> String {
    if value.abs() >= 1000.0 {
        let (thousands, _) = separators(unit);
        let rounded = value.round();
        let digits = group_digits(&format!("{:.0}", rounded.abs()), thousands);
        let sign = if rounded < 0.0 { "-" } else { "" };
        format!("{sign}{digits}")
    } else {
        let (_, decimal) = separators(unit);
        format!("{value:.2}").replace('.', &decimal.to_string())
    }
}

/// `dd-mm-yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Format an API timestamp as a date, falling back to the raw text.
pub fn format_api_date(raw: &str) -> String {
    parse_api_date(raw).map(format_date).unwrap_or_else(|| raw.to_string())
}

/// Day-over-day movement: arrow, absolute delta and percent.
pub fn format_change(change: &Change) -> String {
    let arrow = if change.delta >= 0.0 { '↑' } else { '↓' };
    format!("{arrow} {:.2} ({:.2}%)", change.delta.abs(), change.percent)
}

fn separators(unit: UnitFormat) -> (char, char) {
    match unit {
        UnitFormat::Dollar => (',', '.'),
        UnitFormat::Peso | UnitFormat::Percent => ('.', ','),
    }
}

fn group_fixed(value: f64, thousands: char, decimal: char) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{}{decimal}{frac_part}", group_digits(int_part, thousands))
}

fn group_digits(digits: &str, sep: char) -> String {
    let n = digits.len();
    let mut out = String::with_capacity(n + n / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}
