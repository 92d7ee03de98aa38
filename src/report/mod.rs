//! Reporting utilities: statistics cards, display formatting and CLI summaries.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays free of locale details
//! - the TUI and the CLI print identical numbers

pub mod format;
pub mod stats;
pub mod summary;

pub use format::{format_api_date, format_axis, format_change, format_date, format_value};
pub use stats::{compute_stats, last_update_label};
pub use summary::{format_indicator_list, format_view_summary, view_title};
