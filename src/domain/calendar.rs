//! The fixed 366-slot day-month axis shared by every year on the chart.
//!
//! Slots are laid out as in a leap year, so `02-29` always has a slot even
//! when the year being drawn does not use it. This keeps every dataset
//! index-aligned regardless of the year it came from.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};

/// Number of calendar slots on the x axis.
pub const SLOT_COUNT: usize = 366;

/// Leap reference year used to lay out the slots.
const REFERENCE_YEAR: i32 = 2020;

/// Short month names used for x-axis ticks.
pub const MONTH_ABBREVS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// `MM-DD` labels for every slot, `01-01` through `12-31`.
pub fn day_month_labels() -> &'static [String] {
    static LABELS: OnceLock<Vec<String>> = OnceLock::new();
    LABELS.get_or_init(|| {
        let mut out = Vec::with_capacity(SLOT_COUNT);
        let mut day = NaiveDate::from_ymd_opt(REFERENCE_YEAR, 1, 1);
        while let Some(d) = day {
            if d.year() != REFERENCE_YEAR {
                break;
            }
            out.push(format!("{:02}-{:02}", d.month(), d.day()));
            day = d.succ_opt();
        }
        out
    })
}

/// Slot index of a date. The year is ignored: `2021-03-15` and `1999-03-15`
/// land on the same slot.
pub fn slot_of(date: NaiveDate) -> usize {
    NaiveDate::from_ymd_opt(REFERENCE_YEAR, date.month(), date.day())
        .map(|d| d.ordinal0() as usize)
        // month/day pairs that exist in some year always exist in a leap year
        .unwrap_or(0)
}

/// Slot index of the first day of each month, paired with its short name.
pub fn month_starts() -> [(usize, &'static str); 12] {
    let mut out = [(0usize, ""); 12];
    for (i, name) in MONTH_ABBREVS.iter().enumerate() {
        let slot = NaiveDate::from_ymd_opt(REFERENCE_YEAR, i as u32 + 1, 1)
            .map(|d| d.ordinal0() as usize)
            .unwrap_or(0);
        out[i] = (slot, *name);
    }
    out
}

/// Parse an API timestamp (`2024-03-15T03:00:00.000Z`) or plain date into a
/// calendar date. Only the leading `YYYY-MM-DD` is read.
pub fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// The last `count` calendar years ending at `current_year`, oldest first.
pub fn past_years(count: u32, current_year: i32) -> Vec<i32> {
    (0..count as i32).rev().map(|i| current_year - i).collect()
}
