//! Terminal plotting for the one-shot CLI.

pub mod ascii;

pub use ascii::render_ascii_chart;
