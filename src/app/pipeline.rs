//! The load pipeline shared by the CLI and the TUI.
//!
//! One call to [`Pipeline::load`] is one session:
//! resolve years -> seed empty datasets -> fetch newest to oldest ->
//! progressively merge and redraw -> statistics -> composed cache entry.
//!
//! The pipeline never draws; it pushes chart commands into a [`ChartSink`].

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Datelike;
use tracing::{debug, error, info, warn};

use crate::chart::UpdateMode;
use crate::data::cache::{self, SharedCache};
use crate::data::{CancelToken, FetchClient, FetchOutcome};
use crate::domain::calendar::{day_month_labels, past_years};
use crate::domain::{DashboardView, Dataset, Indicator, RawSample, Registry};
use crate::error::{AppError, ErrorKind};
use crate::math::{fill_gaps, place_samples};
use crate::report::{compute_stats, last_update_label};

/// Year counts offered to the user.
pub const YEAR_CHOICES: [u32; 6] = [1, 2, 3, 4, 5, 10];

pub const DEFAULT_YEAR_COUNT: u32 = 5;

/// Receiver of chart commands produced during a load.
pub trait ChartSink {
    /// Replace the chart with a new one built from `datasets`.
    fn rebuild(&mut self, labels: Vec<String>, datasets: Vec<Dataset>);
    /// Push new data into the current chart.
    fn update(&mut self, datasets: Vec<Dataset>, mode: UpdateMode);
}

/// Sink that discards everything.
pub struct NullSink;

impl ChartSink for NullSink {
    fn rebuild(&mut self, _labels: Vec<String>, _datasets: Vec<Dataset>) {}
    fn update(&mut self, _datasets: Vec<Dataset>, _mode: UpdateMode) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub indicator: String,
    pub year_count: u32,
}

impl LoadRequest {
    pub fn new(indicator: impl Into<String>, year_count: u32) -> Self {
        Self {
            indicator: indicator.into(),
            year_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Success(DashboardView),
    /// Superseded by a newer session; not an error.
    Cancelled,
}

pub struct Pipeline {
    registry: Registry,
    client: FetchClient,
    cache: SharedCache,
    loading: AtomicBool,
    current_year: Option<i32>,
}

impl Pipeline {
    pub fn new(registry: Registry, client: FetchClient, cache: SharedCache) -> Self {
        Self {
            registry,
            client,
            cache,
            loading: AtomicBool::new(false),
            current_year: None,
        }
    }

    /// Pin "this year" instead of reading the local clock.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Still-valid composed view for `(indicator, year_count)`.
    pub fn cached(&self, indicator: &str, year_count: u32) -> Option<DashboardView> {
        cache::lock(&self.cache)
            .views
            .get(&(indicator.to_string(), year_count))
    }

    pub fn clear_cache(&self) {
        cache::lock(&self.cache).clear();
    }

    fn current_year(&self) -> i32 {
        self.current_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Run one load session.
    ///
    /// Rejected with [`ErrorKind::Busy`] while another session is running.
    pub fn load(
        &self,
        request: &LoadRequest,
        token: &CancelToken,
        sink: &mut dyn ChartSink,
    ) -> Result<LoadOutcome, AppError> {
        let Some(_guard) = LoadingGuard::acquire(&self.loading) else {
            debug!(indicator = %request.indicator, "load rejected: busy");
            return Err(AppError::busy());
        };

        info!(indicator = %request.indicator, years = request.year_count, "load started");
        let result = self.run(request, token, sink);
        match &result {
            Ok(LoadOutcome::Success(view)) => {
                info!(indicator = %view.indicator, stats = view.statistics.len(), "load finished");
            }
            Ok(LoadOutcome::Cancelled) => info!(indicator = %request.indicator, "load cancelled"),
            Err(err) => error!(indicator = %request.indicator, %err, "load failed"),
        }
        result
    }

    fn run(
        &self,
        request: &LoadRequest,
        token: &CancelToken,
        sink: &mut dyn ChartSink,
    ) -> Result<LoadOutcome, AppError> {
        let indicator = self
            .registry
            .find(&request.indicator)
            .cloned()
            .ok_or_else(|| AppError::fatal(format!("Unknown indicator '{}'.", request.indicator)))?;

        let years = resolve_years(&indicator, request.year_count, self.current_year());
        if years.is_empty() {
            return Err(AppError::fatal(format!(
                "No data available for {} in the selected years (since {}).",
                indicator.display_name, indicator.earliest_year
            )));
        }

        let labels = day_month_labels().to_vec();
        let mut datasets: Vec<Dataset> = years
            .iter()
            .enumerate()
            .map(|(i, year)| Dataset::empty(format!("{} {year}", indicator.display_name), *year, i))
            .collect();
        sink.rebuild(labels.clone(), datasets.clone());

        // Indexed oldest to newest, filled newest to oldest.
        let mut results: Vec<Option<Vec<RawSample>>> = vec![None; years.len()];
        let last_iteration = years.len() - 1;

        for (iteration, idx) in (0..years.len()).rev().enumerate() {
            if token.is_cancelled() {
                return Ok(LoadOutcome::Cancelled);
            }
            let year = years[idx];

            let samples = match self.client.fetch_year(&indicator, year, token) {
                Ok(FetchOutcome::Series(samples)) => samples,
                Ok(FetchOutcome::Skipped) => {
                    debug!(year, "fetch skipped");
                    continue;
                }
                Ok(FetchOutcome::Cancelled) => return Ok(LoadOutcome::Cancelled),
                Err(err) if err.kind() == ErrorKind::Transient => {
                    warn!(year, %err, "year left empty");
                    continue;
                }
                Err(err) => return Err(err),
            };

            if samples.is_empty() {
                results[idx] = Some(samples);
                continue;
            }

            let placed = place_samples(&mut datasets[idx], &samples);
            debug!(year, samples = samples.len(), placed, "merged year");
            results[idx] = Some(samples);

            if iteration == 0 || iteration % 2 == 0 || iteration == last_iteration {
                sink.update(fill_gaps(&datasets), UpdateMode::DataOnly);
            }
        }

        if token.is_cancelled() {
            return Ok(LoadOutcome::Cancelled);
        }

        let final_datasets = fill_gaps(&datasets);
        sink.update(final_datasets.clone(), UpdateMode::Animated);

        let view = DashboardView {
            indicator: indicator.code.to_string(),
            year_count: request.year_count,
            labels,
            datasets: final_datasets,
            statistics: compute_stats(&indicator, &results),
            last_update: last_update_label(&results),
        };

        cache::lock(&self.cache)
            .views
            .insert((view.indicator.clone(), request.year_count), view.clone());

        Ok(LoadOutcome::Success(view))
    }
}

/// The last `year_count` calendar years that the indicator has data for, oldest first.
pub fn resolve_years(indicator: &Indicator, year_count: u32, current_year: i32) -> Vec<i32> {
    past_years(year_count, current_year)
        .into_iter()
        .filter(|y| *y >= indicator.earliest_year)
        .collect()
}

/// Holds the loading flag for the lifetime of a session.
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::data::client::{HttpReply, RetryPolicy};
    use crate::data::shared_cache;
    use crate::data::testing::{ScriptedSource, series_body};
    use crate::domain::{Indicator, UnitFormat};

    #[derive(Default)]
    struct RecordingSink {
        rebuilds: Vec<Vec<Dataset>>,
        updates: Vec<(Vec<Dataset>, UpdateMode)>,
    }

    impl ChartSink for RecordingSink {
        fn rebuild(&mut self, labels: Vec<String>, datasets: Vec<Dataset>) {
            assert_eq!(labels.len(), 366);
            self.rebuilds.push(datasets);
        }

        fn update(&mut self, datasets: Vec<Dataset>, mode: UpdateMode) {
            self.updates.push((datasets, mode));
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 1,
            base_delay: Duration::ZERO,
            debounce: Duration::ZERO,
        }
    }

    fn pipeline_with(source: ScriptedSource, registry: Registry) -> Pipeline {
        let cache = shared_cache();
        let client = FetchClient::with_policy(Box::new(source), cache.clone(), fast_policy());
        Pipeline::new(registry, client, cache).with_current_year(2024)
    }

    fn ok(samples: &[(&str, Option<f64>)]) -> Result<HttpReply, AppError> {
        Ok(HttpReply::new(200, series_body(samples)))
    }

    #[test]
    fn years_are_clipped_to_the_earliest_year() {
        let reg = Registry::builtin();
        let bitcoin = reg.find("bitcoin").unwrap();
        assert_eq!(resolve_years(bitcoin, 3, 2010), vec![2009, 2010]);
        assert!(resolve_years(bitcoin, 3, 2005).is_empty());
    }

    #[test]
    fn fetches_newest_first_and_orders_results_oldest_first() {
        let source = ScriptedSource::new();
        source.push("dolar", 2024, ok(&[("2024-01-03", Some(900.0)), ("2024-01-02", Some(890.0))]));
        source.push("dolar", 2023, ok(&[("2023-01-02", Some(850.0))]));
        source.push("dolar", 2022, ok(&[("2022-01-02", Some(800.0))]));
        let requests = source.requests();
        let pipeline = pipeline_with(source, Registry::builtin());
        let mut sink = RecordingSink::default();

        let outcome = pipeline
            .load(&LoadRequest::new("dolar", 3), &CancelToken::new(), &mut sink)
            .unwrap();
        let LoadOutcome::Success(view) = outcome else {
            panic!("expected success");
        };

        let years: Vec<i32> = requests.lock().unwrap().iter().map(|(_, y)| *y).collect();
        assert_eq!(years, vec![2024, 2023, 2022]);

        assert_eq!(view.datasets.len(), 3);
        assert_eq!(view.datasets[0].year, 2022);
        assert_eq!(view.datasets[2].label, "Dólar Observado 2024");
        // 01-02 is slot 1; the newest year filled forward from there
        assert_eq!(view.datasets[2].points()[1], Some(890.0));
        assert_eq!(view.datasets[2].points()[2], Some(900.0));
        assert_eq!(view.datasets[2].points()[300], Some(900.0));
        assert_eq!(view.datasets[0].points()[0], None);

        assert_eq!(view.statistics[0].value, "$900,00");
        assert_eq!(view.last_update, "03-01-2024");

        // rebuild with empty data first, progressive updates on iterations 0 and 2, final animated update
        assert_eq!(sink.rebuilds.len(), 1);
        assert!(sink.rebuilds[0].iter().all(|d| d.filled() == 0));
        let modes: Vec<UpdateMode> = sink.updates.iter().map(|(_, m)| *m).collect();
        assert_eq!(modes, vec![UpdateMode::DataOnly, UpdateMode::DataOnly, UpdateMode::Animated]);

        assert_eq!(pipeline.cached("dolar", 3), Some(view));
        assert!(!pipeline.is_loading());
    }

    #[test]
    fn single_eligible_year_gives_one_dataset() {
        let registry = Registry::new(vec![Indicator {
            code: "dolar",
            display_name: "Dólar Observado",
            unit: UnitFormat::Peso,
            earliest_year: 2024,
            glyph: "$",
        }]);
        let source = ScriptedSource::new();
        source.push("dolar", 2024, ok(&[("2024-05-02", Some(940.0))]));
        let calls = source.calls();
        let pipeline = pipeline_with(source, registry);

        let outcome = pipeline
            .load(&LoadRequest::new("dolar", 2), &CancelToken::new(), &mut NullSink)
            .unwrap();
        let LoadOutcome::Success(view) = outcome else {
            panic!("expected success");
        };
        assert_eq!(view.datasets.len(), 1);
        assert_eq!(view.datasets[0].year, 2024);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn no_eligible_years_is_fatal() {
        let pipeline = pipeline_with(ScriptedSource::new(), Registry::builtin()).with_current_year(2000);
        let err = pipeline
            .load(&LoadRequest::new("bitcoin", 5), &CancelToken::new(), &mut NullSink)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);
        assert!(!pipeline.is_loading());
    }

    #[test]
    fn unknown_indicator_is_fatal() {
        let pipeline = pipeline_with(ScriptedSource::new(), Registry::builtin());
        let err = pipeline
            .load(&LoadRequest::new("yen", 1), &CancelToken::new(), &mut NullSink)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn busy_pipeline_rejects_without_network() {
        let source = ScriptedSource::new();
        let calls = source.calls();
        let pipeline = pipeline_with(source, Registry::builtin());
        pipeline.loading.store(true, Ordering::SeqCst);
        let mut sink = RecordingSink::default();

        let err = pipeline
            .load(&LoadRequest::new("dolar", 1), &CancelToken::new(), &mut sink)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Busy);
        assert_eq!(calls.get(), 0);
        assert!(sink.rebuilds.is_empty());
        // the rejected call must not release someone else's session
        assert!(pipeline.is_loading());
    }

    #[test]
    fn transient_year_is_left_empty() {
        let source = ScriptedSource::new();
        source.push("dolar", 2024, ok(&[("2024-01-02", Some(1.0))]));
        source.push("dolar", 2023, Ok(HttpReply::new(500, "")));
        source.push("dolar", 2023, Ok(HttpReply::new(502, "")));
        let pipeline = pipeline_with(source, Registry::builtin());

        let outcome = pipeline
            .load(&LoadRequest::new("dolar", 2), &CancelToken::new(), &mut NullSink)
            .unwrap();
        let LoadOutcome::Success(view) = outcome else {
            panic!("expected success");
        };
        assert_eq!(view.datasets[0].filled(), 0);
        assert!(view.datasets[1].filled() > 0);
    }

    #[test]
    fn malformed_payload_fails_the_session() {
        let source = ScriptedSource::new();
        source.push("dolar", 2024, Ok(HttpReply::new(200, "{")));
        let pipeline = pipeline_with(source, Registry::builtin());

        let err = pipeline
            .load(&LoadRequest::new("dolar", 1), &CancelToken::new(), &mut NullSink)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
        assert!(pipeline.cached("dolar", 1).is_none());
        assert!(!pipeline.is_loading());
    }

    #[test]
    fn cancelled_session_keeps_partial_chart_and_skips_the_cache() {
        let token = CancelToken::new();
        let source = ScriptedSource::new();
        source.push("dolar", 2024, ok(&[("2024-01-02", Some(1.0))]));
        let remote = token.clone();
        // cancel while the second year is in flight
        source.on_get(move |_, year| {
            if year == 2023 {
                remote.cancel();
            }
        });
        let requests = source.requests();
        let pipeline = pipeline_with(source, Registry::builtin());
        let mut sink = RecordingSink::default();

        let outcome = pipeline
            .load(&LoadRequest::new("dolar", 3), &token, &mut sink)
            .unwrap();
        assert_eq!(outcome, LoadOutcome::Cancelled);
        assert_eq!(requests.lock().unwrap().len(), 2);
        // the first year's progressive update went out, no final update
        assert_eq!(sink.updates.len(), 1);
        assert_eq!(sink.updates[0].1, UpdateMode::DataOnly);
        assert!(pipeline.cached("dolar", 3).is_none());
        assert!(!pipeline.is_loading());
    }
}
