//! Coalescing of chart rebuilds and data updates.
//!
//! A rebuild disposes the live chart immediately and schedules the new one
//! after a short settle delay, giving the display a frame to show the
//! loading state before the heavy draw. Updates that arrive while a build is
//! pending wait in a FIFO and are drained right after construction. Queued
//! updates belong to the chart being built; a new rebuild discards them.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::chart::{ChartStyle, LineChart, UpdateMode};
use crate::domain::Dataset;
use crate::error::AppError;

/// Delay between a rebuild request and the actual construction.
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Where the chart ends up being drawn.
pub trait ChartSurface {
    /// Called right before `chart` becomes the live instance. An error aborts the build.
    fn attach(&mut self, chart: &LineChart) -> Result<(), AppError>;
    /// Called when `chart` is disposed.
    fn detach(&mut self, chart: &LineChart);
    fn redraw(&mut self, chart: &LineChart, mode: UpdateMode) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Idle,
    Building { due: Instant },
}

struct PendingBuild {
    labels: Vec<String>,
    datasets: Vec<Dataset>,
    style: ChartStyle,
    due: Instant,
}

struct PendingUpdate {
    datasets: Vec<Dataset>,
    mode: UpdateMode,
}

pub struct ChartQueue<S: ChartSurface> {
    surface: S,
    chart: Option<LineChart>,
    pending: Option<PendingBuild>,
    updates: VecDeque<PendingUpdate>,
    settle: Duration,
    next_id: u64,
}

impl<S: ChartSurface> ChartQueue<S> {
    pub fn new(surface: S) -> Self {
        Self::with_settle(surface, SETTLE_DELAY)
    }

    pub fn with_settle(surface: S, settle: Duration) -> Self {
        Self {
            surface,
            chart: None,
            pending: None,
            updates: VecDeque::new(),
            settle,
            next_id: 1,
        }
    }

    pub fn state(&self) -> QueueState {
        match &self.pending {
            Some(p) => QueueState::Building { due: p.due },
            None => QueueState::Idle,
        }
    }

    pub fn chart(&self) -> Option<&LineChart> {
        self.chart.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Updates waiting for a chart.
    pub fn queued(&self) -> usize {
        self.updates.len()
    }

    /// Dispose the live chart and schedule a fresh one.
    pub fn request_rebuild(&mut self, labels: Vec<String>, datasets: Vec<Dataset>, style: ChartStyle, now: Instant) {
        if self.pending.take().is_some() {
            debug!("superseding pending chart build");
        }
        if !self.updates.is_empty() {
            debug!(dropped = self.updates.len(), "discarding updates for the superseded chart");
            self.updates.clear();
        }
        self.dispose();
        self.pending = Some(PendingBuild {
            labels,
            datasets,
            style,
            due: now + self.settle,
        });
    }

    /// Queue a data update; applied at once when idle with a live chart.
    ///
    /// With neither a live chart nor a pending build the update has no target
    /// and is dropped.
    pub fn request_update(&mut self, datasets: Vec<Dataset>, mode: UpdateMode) -> Result<(), AppError> {
        if self.pending.is_none() && self.chart.is_none() {
            debug!("no chart to update; dropping update");
            return Ok(());
        }
        self.updates.push_back(PendingUpdate { datasets, mode });
        if self.pending.is_none() {
            self.drain()?;
        }
        Ok(())
    }

    /// Apply new presentation options to the live chart (and to a pending build).
    pub fn restyle(&mut self, style: ChartStyle) -> Result<(), AppError> {
        if let Some(pending) = &mut self.pending {
            pending.style = style;
        }
        if let Some(chart) = &mut self.chart {
            chart.set_style(style);
            chart.apply(None, UpdateMode::DataOnly, Instant::now());
            if let Err(err) = self.surface.redraw(chart, UpdateMode::DataOnly) {
                self.updates.clear();
                return Err(err);
            }
        }
        Ok(())
    }

    /// Run a due build. Returns `Ok(true)` when a chart was constructed.
    ///
    /// On failure the queue is emptied and the state returns to idle.
    pub fn tick(&mut self, now: Instant) -> Result<bool, AppError> {
        let due = matches!(&self.pending, Some(p) if p.due <= now);
        if !due {
            return Ok(false);
        }
        let Some(build) = self.pending.take() else {
            return Ok(false);
        };

        // A rebuild always disposes first, but stay strict about the single instance.
        self.dispose();

        let id = self.next_id;
        self.next_id += 1;
        let mut chart = LineChart::new(id, build.labels, build.datasets, build.style);

        if let Err(err) = self.surface.attach(&chart) {
            warn!(%err, "chart build failed");
            self.updates.clear();
            return Err(err);
        }
        chart.apply(None, UpdateMode::Animated, now);
        let redraw = self.surface.redraw(&chart, UpdateMode::Animated);
        self.chart = Some(chart);
        if let Err(err) = redraw {
            self.updates.clear();
            return Err(err);
        }

        debug!(chart = id, queued = self.updates.len(), "chart built");
        self.drain()?;
        Ok(true)
    }

    /// Time of the next scheduled build, if any.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Drop everything: pending build, queued updates and the live chart.
    pub fn teardown(&mut self) {
        self.pending = None;
        self.updates.clear();
        self.dispose();
    }

    fn dispose(&mut self) {
        if let Some(old) = self.chart.take() {
            self.surface.detach(&old);
        }
    }

    fn drain(&mut self) -> Result<(), AppError> {
        let Some(chart) = self.chart.as_mut() else {
            return Ok(());
        };
        while let Some(update) = self.updates.pop_front() {
            chart.apply(Some(update.datasets), update.mode, Instant::now());
            if let Err(err) = self.surface.redraw(chart, update.mode) {
                warn!(%err, "chart update failed; dropping queued updates");
                self.updates.clear();
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSurface {
        attached: u32,
        detached: u32,
        max_live: u32,
        redraws: Vec<(u64, UpdateMode)>,
        fail_attach: bool,
    }

    impl ChartSurface for RecordingSurface {
        fn attach(&mut self, _chart: &LineChart) -> Result<(), AppError> {
            if self.fail_attach {
                return Err(AppError::fatal("chart surface missing"));
            }
            self.attached += 1;
            self.max_live = self.max_live.max(self.attached - self.detached);
            Ok(())
        }

        fn detach(&mut self, _chart: &LineChart) {
            self.detached += 1;
        }

        fn redraw(&mut self, chart: &LineChart, mode: UpdateMode) -> Result<(), AppError> {
            self.redraws.push((chart.id(), mode));
            Ok(())
        }
    }

    fn ds(v: f64) -> Vec<Dataset> {
        labelled("d", v)
    }

    fn labelled(label: &str, v: f64) -> Vec<Dataset> {
        vec![Dataset::from_points(label, 2024, 0, &[Some(v)])]
    }

    #[test]
    fn updates_wait_for_the_build_and_drain_in_order() {
        let mut q = ChartQueue::new(RecordingSurface::default());
        let t0 = Instant::now();
        q.request_rebuild(Vec::new(), ds(0.0), ChartStyle::default(), t0);
        assert!(matches!(q.state(), QueueState::Building { .. }));

        q.request_update(ds(1.0), UpdateMode::DataOnly).unwrap();
        q.request_update(ds(2.0), UpdateMode::Animated).unwrap();
        assert_eq!(q.queued(), 2);

        assert!(!q.tick(t0).unwrap());
        assert!(q.tick(t0 + SETTLE_DELAY).unwrap());
        assert_eq!(q.state(), QueueState::Idle);
        assert_eq!(q.queued(), 0);

        let chart = q.chart().unwrap();
        assert_eq!(chart.datasets()[0].points()[0], Some(2.0));
        let modes: Vec<UpdateMode> = q.surface().redraws.iter().map(|(_, m)| *m).collect();
        assert_eq!(modes, vec![UpdateMode::Animated, UpdateMode::DataOnly, UpdateMode::Animated]);
    }

    #[test]
    fn idle_update_applies_immediately() {
        let mut q = ChartQueue::with_settle(RecordingSurface::default(), Duration::ZERO);
        let t0 = Instant::now();
        q.request_rebuild(Vec::new(), ds(0.0), ChartStyle::default(), t0);
        q.tick(t0).unwrap();

        q.request_update(ds(5.0), UpdateMode::DataOnly).unwrap();
        assert_eq!(q.queued(), 0);
        assert_eq!(q.chart().unwrap().datasets()[0].points()[0], Some(5.0));
    }

    #[test]
    fn rebuild_disposes_before_constructing() {
        let mut q = ChartQueue::with_settle(RecordingSurface::default(), Duration::ZERO);
        let t0 = Instant::now();
        for _ in 0..3 {
            q.request_rebuild(Vec::new(), ds(0.0), ChartStyle::default(), t0);
            assert!(q.chart().is_none());
            q.tick(t0).unwrap();
        }
        assert_eq!(q.surface().max_live, 1);
        assert_eq!(q.surface().attached, 3);
        assert_eq!(q.surface().detached, 2);
        assert_eq!(q.chart().unwrap().id(), 3);
    }

    #[test]
    fn second_rebuild_cancels_the_pending_one() {
        let mut q = ChartQueue::new(RecordingSurface::default());
        let t0 = Instant::now();
        q.request_rebuild(Vec::new(), ds(1.0), ChartStyle::default(), t0);
        q.request_rebuild(Vec::new(), ds(2.0), ChartStyle::default(), t0 + Duration::from_millis(30));

        assert!(!q.tick(t0 + SETTLE_DELAY).unwrap());
        assert!(q.tick(t0 + Duration::from_millis(30) + SETTLE_DELAY).unwrap());
        assert_eq!(q.surface().attached, 1);
        assert_eq!(q.chart().unwrap().datasets()[0].points()[0], Some(2.0));
    }

    #[test]
    fn failed_build_returns_to_idle_with_an_empty_queue() {
        let surface = RecordingSurface {
            fail_attach: true,
            ..Default::default()
        };
        let mut q = ChartQueue::with_settle(surface, Duration::ZERO);
        let t0 = Instant::now();
        q.request_rebuild(Vec::new(), ds(0.0), ChartStyle::default(), t0);
        q.request_update(ds(1.0), UpdateMode::DataOnly).unwrap();

        assert!(q.tick(t0).is_err());
        assert_eq!(q.state(), QueueState::Idle);
        assert_eq!(q.queued(), 0);
        assert!(q.chart().is_none());

        // the queue is usable again afterwards
        q.surface_mut().fail_attach = false;
        q.request_rebuild(Vec::new(), ds(0.0), ChartStyle::default(), t0);
        assert!(q.tick(t0).unwrap());
    }

    #[test]
    fn rebuild_discards_updates_meant_for_the_previous_chart() {
        let mut q = ChartQueue::with_settle(RecordingSurface::default(), Duration::ZERO);
        let t0 = Instant::now();
        q.request_rebuild(Vec::new(), labelled("dolar 2024", 0.0), ChartStyle::default(), t0);
        q.request_update(labelled("dolar 2024", 900.0), UpdateMode::DataOnly).unwrap();
        assert_eq!(q.queued(), 1);

        q.request_rebuild(Vec::new(), labelled("euro 2024", 1000.0), ChartStyle::default(), t0);
        assert_eq!(q.queued(), 0);
        assert!(q.tick(t0).unwrap());

        let chart = q.chart().unwrap();
        assert_eq!(chart.datasets()[0].label, "euro 2024");
        assert_eq!(chart.datasets()[0].points()[0], Some(1000.0));
        assert_eq!(q.surface().redraws, vec![(1, UpdateMode::Animated)]);
    }

    #[test]
    fn updates_after_a_failed_build_are_not_carried_over() {
        let surface = RecordingSurface {
            fail_attach: true,
            ..Default::default()
        };
        let mut q = ChartQueue::with_settle(surface, Duration::ZERO);
        let t0 = Instant::now();
        q.request_rebuild(Vec::new(), labelled("dolar 2024", 0.0), ChartStyle::default(), t0);
        assert!(q.tick(t0).is_err());

        q.request_update(labelled("dolar 2024", 900.0), UpdateMode::DataOnly).unwrap();
        q.request_update(labelled("dolar 2024", 901.0), UpdateMode::Animated).unwrap();
        assert_eq!(q.queued(), 0);
        assert!(q.surface().redraws.is_empty());

        q.surface_mut().fail_attach = false;
        q.request_rebuild(Vec::new(), labelled("euro 2024", 1000.0), ChartStyle::default(), t0);
        assert!(q.tick(t0).unwrap());
        let chart = q.chart().unwrap();
        assert_eq!(chart.datasets()[0].label, "euro 2024");
        assert_eq!(chart.datasets()[0].points()[0], Some(1000.0));
        assert_eq!(q.surface().redraws.len(), 1);
    }

    #[test]
    fn restyle_updates_the_live_chart() {
        let mut q = ChartQueue::with_settle(RecordingSurface::default(), Duration::ZERO);
        let t0 = Instant::now();
        q.request_rebuild(Vec::new(), ds(0.0), ChartStyle::default(), t0);
        q.tick(t0).unwrap();

        let style = ChartStyle { smooth: true, show_points: true };
        q.restyle(style).unwrap();
        assert_eq!(q.chart().unwrap().style(), style);
        assert_eq!(q.surface().redraws.len(), 2);
    }
}
