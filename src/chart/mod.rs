//! Chart model shared by the pipeline and the display layer.
//!
//! The pipeline never draws. It hands datasets to a [`ChartQueue`], which owns
//! the single live [`LineChart`] and tells a [`ChartSurface`] when to attach,
//! detach and redraw it.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::domain::Dataset;
use crate::math::smooth::SMOOTH_TENSION;

pub mod queue;

pub use queue::{ChartQueue, ChartSurface, QueueState};

/// Line colours, assigned to datasets by index (oldest year first).
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),
    (231, 76, 60),
    (46, 204, 113),
    (155, 89, 182),
    (241, 196, 15),
    (230, 126, 34),
    (52, 73, 94),
    (22, 160, 133),
    (192, 57, 43),
    (142, 68, 173),
];

/// Duration of the reveal animation for [`UpdateMode::Animated`] redraws.
pub const ANIMATION: Duration = Duration::from_millis(800);

pub fn palette_color(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// User-toggled presentation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChartStyle {
    pub smooth: bool,
    pub show_points: bool,
}

impl ChartStyle {
    pub fn tension(&self) -> f64 {
        if self.smooth { SMOOTH_TENSION } else { 0.0 }
    }
}

/// How a data update is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Full redraw with the reveal animation.
    Animated,
    /// Swap the data in place, no animation.
    DataOnly,
}

/// The live chart instance.
#[derive(Debug, Clone)]
pub struct LineChart {
    id: u64,
    labels: Vec<String>,
    datasets: Vec<Dataset>,
    style: ChartStyle,
    redraws: u64,
    animated_at: Option<Instant>,
}

impl LineChart {
    pub(crate) fn new(id: u64, labels: Vec<String>, datasets: Vec<Dataset>, style: ChartStyle) -> Self {
        Self {
            id,
            labels,
            datasets,
            style,
            redraws: 0,
            animated_at: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn style(&self) -> ChartStyle {
        self.style
    }

    /// Number of redraws applied since construction.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub(crate) fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
    }

    pub(crate) fn apply(&mut self, datasets: Option<Vec<Dataset>>, mode: UpdateMode, now: Instant) {
        if let Some(datasets) = datasets {
            self.datasets = datasets;
        }
        self.redraws += 1;
        if mode == UpdateMode::Animated {
            self.animated_at = Some(now);
        }
    }

    /// Fraction of the x axis revealed by the running animation, in `[0, 1]`.
    pub fn revealed(&self, now: Instant) -> f64 {
        match self.animated_at {
            Some(start) => {
                let t = now.saturating_duration_since(start).as_secs_f64() / ANIMATION.as_secs_f64();
                t.clamp(0.0, 1.0)
            }
            None => 1.0,
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.revealed(now) < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_runs_for_its_duration() {
        let mut chart = LineChart::new(1, Vec::new(), Vec::new(), ChartStyle::default());
        let t0 = Instant::now();
        assert_eq!(chart.revealed(t0), 1.0);

        chart.apply(None, UpdateMode::Animated, t0);
        assert_eq!(chart.revealed(t0), 0.0);
        assert!(chart.is_animating(t0 + ANIMATION / 2));
        assert_eq!(chart.revealed(t0 + ANIMATION), 1.0);

        chart.apply(None, UpdateMode::DataOnly, t0 + ANIMATION);
        assert_eq!(chart.redraws(), 2);
    }

    #[test]
    fn style_toggles() {
        let style = ChartStyle { smooth: true, show_points: false };
        assert!(style.tension() > 0.0);
        assert_eq!(ChartStyle::default().tension(), 0.0);
        assert_eq!(palette_color(10), PALETTE[0]);
    }
}
