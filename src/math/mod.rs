//! Numerical helpers for the chart axis.
//!
//! - `gap_fill`: slot placement and linear gap interpolation
//! - `smooth`: Bezier spline smoothing for the line-smoothing toggle

pub mod gap_fill;
pub mod smooth;

pub use gap_fill::{fill_gaps, place_samples};
