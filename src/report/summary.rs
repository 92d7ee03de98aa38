//! Plain-text reports for the one-shot CLI.

use std::fmt::Write;

use crate::domain::calendar::SLOT_COUNT;
use crate::domain::{DashboardView, Indicator, Registry};
use crate::report::format::format_change;

/// Title shown above the chart.
pub fn view_title(indicator: &Indicator, year_count: u32) -> String {
    let span = if year_count == 1 {
        "current year".to_string()
    } else {
        format!("last {year_count} years comparison")
    };
    format!("{} - {span}", indicator.display_name)
}

/// Statistics cards and per-year coverage for a finished view.
pub fn format_view_summary(view: &DashboardView, indicator: &Indicator) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view_title(indicator, view.year_count));
    let _ = writeln!(out, "Last update: {}", view.last_update);
    let _ = writeln!(out);

    if view.statistics.is_empty() {
        let _ = writeln!(out, "No statistics: the API returned no values.");
    }
    for stat in &view.statistics {
        let _ = write!(out, "  {:<24} {:>18}  {}", stat.title, stat.value, stat.subtext);
        if let Some(change) = &stat.change {
            let _ = write!(out, "  {}", format_change(change));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Coverage (days with data after gap filling):");
    for ds in &view.datasets {
        let _ = writeln!(out, "  {:<6} {:>3}/{SLOT_COUNT}", ds.year, ds.filled());
    }
    out
}

/// Known indicators, one per line, in tab order.
pub fn format_indicator_list(registry: &Registry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:<4} {:<26} {:>5}", "CODE", "UNIT", "NAME", "SINCE");
    for ind in registry.iter() {
        let _ = writeln!(
            out,
            "{:<16} {:<4} {:<26} {:>5}",
            ind.code,
            ind.unit.symbol(),
            ind.display_name,
            ind.earliest_year
        );
    }
    out
}
