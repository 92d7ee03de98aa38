//! Input/output helpers.
//!
//! - dashboard view exports (JSON/CSV) (`export`)

pub mod export;

pub use export::*;
