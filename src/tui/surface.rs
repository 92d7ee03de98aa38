//! [`ChartSurface`] backed by the terminal frame.
//!
//! Ratatui redraws the whole frame each time, so the surface only tracks
//! whether a redraw is owed and whether the terminal can host a chart at all.

use tracing::debug;

use crate::chart::{ChartSurface, LineChart, UpdateMode};
use crate::error::AppError;

pub(crate) struct TerminalSurface {
    width: u16,
    height: u16,
    attached: Option<u64>,
    dirty: bool,
}

impl TerminalSurface {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            attached: None,
            dirty: true,
        }
    }

    pub(crate) fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.dirty = true;
    }

    /// Chart id currently on screen.
    pub(crate) fn attached(&self) -> Option<u64> {
        self.attached
    }

    /// Returns and clears the pending-redraw flag.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl ChartSurface for TerminalSurface {
    fn attach(&mut self, chart: &LineChart) -> Result<(), AppError> {
        if self.width == 0 || self.height == 0 {
            return Err(AppError::fatal("Chart surface unavailable: terminal has no drawable area"));
        }
        debug!(chart = chart.id(), "chart attached");
        self.attached = Some(chart.id());
        self.dirty = true;
        Ok(())
    }

    fn detach(&mut self, chart: &LineChart) {
        if self.attached == Some(chart.id()) {
            self.attached = None;
        }
        self.dirty = true;
    }

    fn redraw(&mut self, _chart: &LineChart, _mode: UpdateMode) -> Result<(), AppError> {
        self.dirty = true;
        Ok(())
    }
}
