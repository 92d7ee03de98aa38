//! Plotters-powered multi-year line chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::UnitFormat;
use crate::domain::calendar::month_starts;
use crate::report::format_axis;

/// One year, ready to draw: contiguous runs of points plus optional markers.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPath {
    pub color: (u8, u8, u8),
    /// Missing days split a year into separate segments.
    pub segments: Vec<Vec<(f64, f64)>>,
    pub markers: Vec<(f64, f64)>,
}

/// A render-only chart description; all series and bounds are computed outside `render()`.
pub struct IndicatorChart<'a> {
    pub series: &'a [SeriesPath],
    /// X bounds (day-of-year slot).
    pub x_bounds: [f64; 2],
    /// Y bounds in the indicator's unit.
    pub y_bounds: [f64; 2],
    pub unit: UnitFormat,
}

impl<'a> Widget for IndicatorChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(12)
                .y_labels(5)
                .x_label_formatter(&|v| month_label(*v))
                .y_label_formatter(&|v| format_axis(*v, self.unit))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for series in self.series {
                let (r, g, b) = series.color;
                let color = RGBColor(r, g, b);
                for segment in &series.segments {
                    chart.draw_series(LineSeries::new(segment.iter().copied(), &color))?;
                }

                // `Circle` radii are mis-scaled by the ratatui backend; a
                // white pixel reads as a dot on top of the coloured line.
                chart.draw_series(series.markers.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Month abbreviation for an x position on the day-of-year axis.
pub fn month_label(slot: f64) -> String {
    month_starts()
        .iter()
        .rev()
        .find(|(start, _)| *start as f64 <= slot + 0.5)
        .map(|(_, name)| name.to_string())
        .unwrap_or_default()
}
