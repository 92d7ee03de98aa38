//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks without the TUI
//! - deterministic output (helpful for golden tests)
//!
//! Each year is drawn with the last digit of its year, so a ten-year
//! comparison still gets distinct glyphs. The bottom row marks month starts.

use crate::domain::calendar::{SLOT_COUNT, month_starts};
use crate::domain::{Dataset, UnitFormat};
use crate::report::format_axis;

/// Render the multi-year chart. Missing points break the line.
pub fn render_ascii_chart(datasets: &[Dataset], unit: UnitFormat, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let x_max = (SLOT_COUNT - 1) as f64;

    let (y_min, y_max) = y_range(datasets).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Newest year first so it wins shared cells.
    for ds in datasets.iter().rev() {
        let ch = year_glyph(ds.year);
        let mut prev: Option<(usize, usize)> = None;
        for (slot, value) in ds.points().iter().enumerate() {
            let Some(v) = value else {
                prev = None;
                continue;
            };
            let x = map_x(slot as f64, 0.0, x_max, width);
            let y = map_y(*v, y_min, y_max, height);
            match prev {
                Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, ch),
                None => {
                    if grid[y][x] == ' ' {
                        grid[y][x] = ch;
                    }
                }
            }
            prev = Some((x, y));
        }
    }

    let mut months = vec![' '; width];
    for (slot, name) in month_starts() {
        let x = map_x(slot as f64, 0.0, x_max, width);
        if months[x] == ' ' {
            months[x] = name.chars().next().unwrap_or(' ');
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Chart: Ene..Dic | y=[{} .. {}]\n",
        format_axis(y_min, unit),
        format_axis(y_max, unit)
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&months.into_iter().collect::<String>());
    out.push('\n');

    let legend: Vec<String> = datasets
        .iter()
        .map(|ds| format!("{}={}", year_glyph(ds.year), ds.year))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join(" ")));
    out
}

fn year_glyph(year: i32) -> char {
    char::from_digit(year.rem_euclid(10) as u32, 10).unwrap_or('*')
}

fn y_range(datasets: &[Dataset]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for v in datasets.iter().flat_map(|ds| ds.points().iter().flatten()) {
        min_y = min_y.min(*v);
        max_y = max_y.max(*v);
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // flat series: open a window around the value
        let pad = (min_y.abs() * 0.01).max(1.0);
        Some((min_y - pad, max_y + pad))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_golden_snapshot_small() {
        let datasets = vec![
            Dataset::from_points("2023", 2023, 0, &vec![Some(100.0); SLOT_COUNT]),
            Dataset::from_points("2024", 2024, 1, &vec![Some(110.0); SLOT_COUNT]),
        ];

        let txt = render_ascii_chart(&datasets, UnitFormat::Peso, 10, 5);
        let expected = concat!(
            "Chart: Ene..Dic | y=[99,50 .. 110,50]\n",
            "4444444444\n",
            "          \n",
            "          \n",
            "          \n",
            "3333333333\n",
            "EFAMJASON \n",
            "Legend: 3=2023 4=2024\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn gaps_break_the_line_and_empty_input_still_renders() {
        let mut points = vec![None; SLOT_COUNT];
        points[0] = Some(1.0);
        points[SLOT_COUNT - 1] = Some(2.0);
        let ds = vec![Dataset::from_points("2024", 2024, 0, &points)];
        let txt = render_ascii_chart(&ds, UnitFormat::Percent, 10, 5);
        let body: Vec<&str> = txt.lines().skip(1).take(5).collect();
        // only the two endpoints are plotted
        let marks: usize = body.iter().map(|row| row.matches('4').count()).sum();
        assert_eq!(marks, 2);

        let empty = render_ascii_chart(&[], UnitFormat::Peso, 10, 5);
        assert!(empty.starts_with("Chart: Ene..Dic"));
    }
}
