//! Command-line parsing for the indicator dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline and rendering code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::pipeline::{DEFAULT_YEAR_COUNT, YEAR_CHOICES};
use crate::domain::DEFAULT_INDICATOR;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "econ", version, about = "Multi-year economic indicator dashboard (mindicador.cl)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    Tui(ViewArgs),
    /// Load one indicator, print statistics and an ASCII chart, then exit.
    Show(ShowArgs),
    /// List the known indicators.
    List,
}

/// Options shared by the dashboard and `show`.
#[derive(Debug, Args, Clone)]
pub struct ViewArgs {
    /// Indicator code (see `econ list`).
    #[arg(short = 'i', long, default_value = DEFAULT_INDICATOR)]
    pub indicator: String,

    /// Number of years to compare (1, 2, 3, 4, 5 or 10).
    #[arg(short = 'y', long, default_value_t = DEFAULT_YEAR_COUNT, value_parser = parse_year_count)]
    pub years: u32,

    /// Smooth the lines.
    #[arg(long)]
    pub smooth: bool,

    /// Draw point markers.
    #[arg(long)]
    pub points: bool,

    /// API base URL (defaults to $ECON_API_BASE or https://mindicador.cl/api).
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,
}

/// Options for the one-shot `show` command.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Skip the ASCII chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Write the composed view to a `.json` or `.csv` file.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

fn parse_year_count(raw: &str) -> Result<u32, String> {
    let n: u32 = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
    if YEAR_CHOICES.contains(&n) {
        Ok(n)
    } else {
        Err(format!("year count must be one of {YEAR_CHOICES:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_count_is_restricted_to_the_choices() {
        assert_eq!(parse_year_count("10"), Ok(10));
        assert!(parse_year_count("7").is_err());
        assert!(parse_year_count("x").is_err());
    }

    #[test]
    fn show_parses_flags() {
        let cli = Cli::parse_from(["econ", "show", "-i", "uf", "-y", "3", "--smooth", "--no-plot"]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.view.indicator, "uf");
        assert_eq!(args.view.years, 3);
        assert!(args.view.smooth);
        assert!(args.no_plot);
    }
}
