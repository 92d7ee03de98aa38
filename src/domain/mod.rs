//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed day-month calendar axis (`calendar`)
//! - the indicator registry (`Indicator`, `Registry`)
//! - samples, datasets and statistics cards (`RawSample`, `Dataset`, `Stat`)

pub mod calendar;
pub mod indicator;
pub mod types;

pub use indicator::*;
pub use types::*;
