//! Export a composed dashboard view.
//!
//! JSON carries the whole view (datasets, statistics, last update). CSV is a
//! day-by-year table meant for spreadsheets: one row per calendar slot, one
//! column per year.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::DashboardView;
use crate::error::AppError;

/// Write `view` to `path`, picking the format from the extension (`.csv`, anything else is JSON).
pub fn write_view(path: &Path, view: &DashboardView) -> Result<(), AppError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_view_csv(path, view)
    } else {
        write_view_json(path, view)
    }
}

pub fn write_view_json(path: &Path, view: &DashboardView) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), view)
        .map_err(|e| AppError::io(format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

pub fn write_view_csv(path: &Path, view: &DashboardView) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    write_csv(&mut out, view).map_err(|e| AppError::io(format!("Failed to write export CSV: {e}")))?;
    out.flush()
        .map_err(|e| AppError::io(format!("Failed to write export CSV: {e}")))?;
    Ok(())
}

fn write_csv(out: &mut impl Write, view: &DashboardView) -> std::io::Result<()> {
    // Header
    write!(out, "day")?;
    for ds in &view.datasets {
        write!(out, ",{}", ds.label)?;
    }
    writeln!(out)?;

    for (slot, label) in view.labels.iter().enumerate() {
        write!(out, "{label}")?;
        for ds in &view.datasets {
            match ds.points().get(slot).copied().flatten() {
                Some(v) => write!(out, ",{v:.4}")?,
                None => write!(out, ",")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
