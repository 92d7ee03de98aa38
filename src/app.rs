//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - builds the load pipeline against the mindicador.cl API
//! - dispatches to the TUI or the one-shot commands

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::chart::UpdateMode;
use crate::cli::{Command, ShowArgs, ViewArgs};
use crate::data::{CancelToken, FetchClient, MindicadorSource, shared_cache};
use crate::domain::{Dataset, Registry};
use crate::error::AppError;
use crate::logging::{self, LogTarget};

pub mod pipeline;
pub mod session;

use pipeline::{ChartSink, LoadOutcome, LoadRequest, Pipeline};

/// Entry point for the `econ` binary.
pub fn run() -> Result<(), AppError> {
    // `econ` and `econ -i uf` behave like `econ tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => {
            logging::init(LogTarget::File(logging::log_file_path()), "info")?;
            handle_tui(args)
        }
        Command::Show(args) => {
            logging::init(LogTarget::Stderr, "warn")?;
            handle_show(args)
        }
        Command::List => {
            print!("{}", crate::report::format_indicator_list(&Registry::builtin()));
            Ok(())
        }
    }
}

fn handle_tui(args: ViewArgs) -> Result<(), AppError> {
    let pipeline = build_pipeline(&args)?;
    crate::tui::run(Arc::new(pipeline), args)
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let pipeline = build_pipeline(&args.view)?;
    let request = LoadRequest::new(args.view.indicator.clone(), args.view.years);

    let mut sink = ProgressSink::default();
    let outcome = pipeline.load(&request, &CancelToken::new(), &mut sink)?;
    let LoadOutcome::Success(view) = outcome else {
        return Err(AppError::fatal("Load was cancelled"));
    };

    let indicator = pipeline
        .registry()
        .find(&view.indicator)
        .ok_or_else(|| AppError::usage(format!("Unknown indicator '{}'", view.indicator)))?;

    println!("{}", crate::report::format_view_summary(&view, indicator));

    if !args.no_plot {
        let plot = crate::plot::render_ascii_chart(&view.datasets, indicator.unit, args.width, args.height);
        println!("{plot}");
    }

    // Optional export.
    if let Some(path) = &args.export {
        crate::io::export::write_view(path, &view)?;
        info!(path = %path.display(), "view exported");
    }

    Ok(())
}

/// Build the pipeline for the requested indicator.
///
/// The indicator is validated here so a typo fails before any network work.
pub fn build_pipeline(args: &ViewArgs) -> Result<Pipeline, AppError> {
    let registry = Registry::builtin();
    if registry.find(&args.indicator).is_none() {
        let known: Vec<&str> = registry.iter().map(|i| i.code).collect();
        return Err(AppError::usage(format!(
            "Unknown indicator '{}' (known: {})",
            args.indicator,
            known.join(", ")
        )));
    }

    let source = match &args.api_base {
        Some(base) => MindicadorSource::new(base.as_str())?,
        None => MindicadorSource::from_env()?,
    };
    info!(base = source.base_url(), "using API");

    let cache = shared_cache();
    let client = FetchClient::new(Box::new(source), cache.clone());
    Ok(Pipeline::new(registry, client, cache))
}

/// Reports fetch progress on stderr while `show` runs.
#[derive(Default)]
struct ProgressSink {
    years: usize,
}

impl ChartSink for ProgressSink {
    fn rebuild(&mut self, _labels: Vec<String>, datasets: Vec<Dataset>) {
        self.years = datasets.len();
        eprintln!("Fetching {} year(s)...", self.years);
    }

    fn update(&mut self, datasets: Vec<Dataset>, mode: UpdateMode) {
        if mode == UpdateMode::DataOnly {
            let with_data = datasets.iter().filter(|d| d.filled() > 0).count();
            eprintln!("  {with_data}/{} year(s) with data", self.years);
        }
    }
}

/// Rewrite argv so `econ` defaults to `econ tui`.
///
/// Rules:
/// - `econ`                      -> `econ tui`
/// - `econ -i uf ...`            -> `econ tui -i uf ...`
/// - `econ --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "show" | "list");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
