//! Ratatui-based terminal dashboard.
//!
//! A tab strip picks the indicator, a settings panel picks the year count and
//! chart options, and the body shows the multi-year chart next to the
//! statistics cards. Loads run on a background session; the event loop
//! drains their chart commands into the [`ChartQueue`].

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
};
use tracing::{info, warn};

use crate::app::pipeline::{LoadOutcome, LoadRequest, Pipeline, YEAR_CHOICES};
use crate::app::session::{SessionEventKind, SessionRunner};
use crate::chart::{ChartQueue, ChartStyle, LineChart, palette_color};
use crate::cli::ViewArgs;
use crate::domain::calendar::{SLOT_COUNT, month_starts};
use crate::domain::{DashboardView, Indicator, Stat, UnitFormat};
use crate::error::{AppError, ErrorKind};
use crate::math::smooth::smooth_path;
use crate::report::{format_axis, format_change, view_title};

mod plotters_chart;
mod surface;

use plotters_chart::{IndicatorChart, SeriesPath};
use surface::TerminalSurface;

/// Quiet period after a year-count change before reloading.
const YEAR_DEBOUNCE: Duration = Duration::from_millis(500);
/// Minimum spacing between two indicator switches.
const SWITCH_THROTTLE: Duration = Duration::from_millis(500);
/// Interpolated samples per segment when smoothing.
const SMOOTH_STEPS: usize = 4;

const SETTINGS: usize = 3;
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Start the TUI.
pub fn run(pipeline: Arc<Pipeline>, args: ViewArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::io(format!("Failed to initialize terminal: {e}")))?;
    let size = terminal
        .size()
        .map_err(|e| AppError::io(format!("Failed to read terminal size: {e}")))?;

    let mut app = App::new(pipeline, &args, (size.width, size.height), Instant::now())?;
    let result = app.event_loop(&mut terminal);
    app.shutdown();
    result
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::io(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::io(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    runner: SessionRunner,
    queue: ChartQueue<TerminalSurface>,
    indicator: String,
    year_count: u32,
    style: ChartStyle,
    selected_field: usize,
    status: String,
    error: Option<String>,
    stats: Vec<Stat>,
    last_update: String,
    reload_due: Option<Instant>,
    last_switch: Option<Instant>,
    started: Instant,
}

impl App {
    fn new(pipeline: Arc<Pipeline>, args: &ViewArgs, size: (u16, u16), now: Instant) -> Result<Self, AppError> {
        let mut app = Self {
            runner: SessionRunner::new(pipeline),
            queue: ChartQueue::new(TerminalSurface::new(size.0, size.1)),
            indicator: args.indicator.clone(),
            year_count: args.years,
            style: ChartStyle {
                smooth: args.smooth,
                show_points: args.points,
            },
            selected_field: 0,
            status: String::new(),
            error: None,
            stats: Vec::new(),
            last_update: String::new(),
            reload_due: None,
            last_switch: None,
            started: now,
        };
        app.show_current(now)?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            let now = Instant::now();
            needs_redraw |= self.step(now)?;

            let animating = self.queue.chart().is_some_and(|c| c.is_animating(now));
            if needs_redraw || animating || self.runner.is_busy() {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::io(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            let timeout = self.poll_timeout(now, animating);
            if !event::poll(timeout).map_err(|e| AppError::io(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::io(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code, Instant::now())? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(w, h) => {
                    self.queue.surface_mut().resize(w, h);
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Session events, the debounced reload and due chart builds. Returns whether anything changed.
    fn step(&mut self, now: Instant) -> Result<bool, AppError> {
        let mut changed = self.pump_sessions(now)?;

        if self.reload_due.is_some_and(|due| due <= now) {
            self.reload_due = None;
            self.show_current(now)?;
            changed = true;
        }

        match self.queue.tick(now) {
            Ok(built) => changed |= built,
            Err(err) => {
                self.show_error(&err);
                changed = true;
            }
        }
        changed |= self.queue.surface_mut().take_dirty();
        Ok(changed)
    }

    fn poll_timeout(&self, now: Instant, animating: bool) -> Duration {
        let mut timeout = if animating || self.runner.is_busy() {
            Duration::from_millis(33)
        } else {
            Duration::from_millis(100)
        };
        for due in [self.queue.next_due(), self.reload_due].into_iter().flatten() {
            timeout = timeout.min(due.saturating_duration_since(now));
        }
        timeout
    }

    fn pump_sessions(&mut self, now: Instant) -> Result<bool, AppError> {
        let events = self.runner.poll()?;
        let changed = !events.is_empty();

        for event in events {
            match event.kind {
                SessionEventKind::Rebuild { labels, datasets } => {
                    self.queue.request_rebuild(labels, datasets, self.style, now);
                }
                SessionEventKind::Update { datasets, mode } => {
                    if let Err(err) = self.queue.request_update(datasets, mode) {
                        self.show_error(&err);
                    }
                }
                SessionEventKind::Finished(Ok(LoadOutcome::Success(view))) => {
                    info!(indicator = %view.indicator, years = view.year_count, "view ready");
                    self.status = format!("Loaded {} ({} year(s))", view.indicator, view.year_count);
                    self.stats = view.statistics;
                    self.last_update = view.last_update;
                }
                SessionEventKind::Finished(Ok(LoadOutcome::Cancelled)) => {}
                SessionEventKind::Finished(Err(err)) => {
                    if err.kind() == ErrorKind::Busy {
                        self.status = err.to_string();
                    } else {
                        self.show_error(&err);
                    }
                }
            }
        }
        Ok(changed)
    }

    fn handle_key(&mut self, code: KeyCode, now: Instant) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Tab | KeyCode::Char(']') => self.step_indicator(1, now)?,
            KeyCode::BackTab | KeyCode::Char('[') => self.step_indicator(-1, now)?,
            KeyCode::Char(c @ '0'..='9') => {
                // 1..9 pick a tab, 0 picks the tenth
                let index = c.to_digit(10).map(|d| (d as usize + 9) % 10).unwrap_or(0);
                let code = self.runner.pipeline().registry().get(index).map(|i| i.code);
                if let Some(code) = code {
                    self.select_indicator(code, now)?;
                }
            }
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < SETTINGS {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1, now)?,
            KeyCode::Right | KeyCode::Enter => self.adjust_field(1, now)?,
            KeyCode::Char('s') => self.toggle_smooth()?,
            KeyCode::Char('p') => self.toggle_points()?,
            KeyCode::Char('r') => {
                self.reload_due = None;
                self.start_load()?;
            }
            KeyCode::Char('c') => {
                self.runner.pipeline().clear_cache();
                self.status = "Cache cleared.".to_string();
            }
            _ => {}
        }
        Ok(false)
    }

    fn adjust_field(&mut self, delta: i32, now: Instant) -> Result<(), AppError> {
        match self.selected_field {
            0 => {
                let pos = YEAR_CHOICES.iter().position(|&n| n == self.year_count).unwrap_or(0);
                let next = (pos as i32 + delta).clamp(0, YEAR_CHOICES.len() as i32 - 1) as usize;
                if YEAR_CHOICES[next] != self.year_count {
                    self.year_count = YEAR_CHOICES[next];
                    self.reload_due = Some(now + YEAR_DEBOUNCE);
                    self.status = format!("years: {}", self.year_count);
                }
            }
            1 => self.toggle_smooth()?,
            2 => self.toggle_points()?,
            _ => {}
        }
        Ok(())
    }

    fn toggle_smooth(&mut self) -> Result<(), AppError> {
        self.style.smooth = !self.style.smooth;
        self.status = format!("smooth lines: {}", on_off(self.style.smooth));
        self.restyle()
    }

    fn toggle_points(&mut self) -> Result<(), AppError> {
        self.style.show_points = !self.style.show_points;
        self.status = format!("show points: {}", on_off(self.style.show_points));
        self.restyle()
    }

    fn restyle(&mut self) -> Result<(), AppError> {
        if let Err(err) = self.queue.restyle(self.style) {
            self.show_error(&err);
        }
        Ok(())
    }

    fn step_indicator(&mut self, delta: i32, now: Instant) -> Result<(), AppError> {
        let next = self
            .runner
            .pipeline()
            .registry()
            .step(&self.indicator, delta)
            .map(|i| i.code);
        match next {
            Some(code) => self.select_indicator(code, now),
            None => Ok(()),
        }
    }

    /// Switch tabs. Rapid switches inside the throttle window are ignored.
    fn select_indicator(&mut self, code: &str, now: Instant) -> Result<(), AppError> {
        if code == self.indicator {
            return Ok(());
        }
        if self
            .last_switch
            .is_some_and(|last| now.saturating_duration_since(last) < SWITCH_THROTTLE)
        {
            return Ok(());
        }
        self.last_switch = Some(now);
        self.indicator = code.to_string();
        self.reload_due = None;
        self.show_current(now)
    }

    /// Show the current selection: from the view cache when fresh, otherwise via a new session.
    fn show_current(&mut self, now: Instant) -> Result<(), AppError> {
        match self.runner.pipeline().cached(&self.indicator, self.year_count) {
            Some(view) => {
                self.runner.cancel();
                self.display_view(view, now);
                Ok(())
            }
            None => self.start_load(),
        }
    }

    fn display_view(&mut self, view: DashboardView, now: Instant) {
        self.error = None;
        self.status = format!("{} ({} year(s)) from cache", view.indicator, view.year_count);
        self.queue.request_rebuild(view.labels, view.datasets, self.style, now);
        self.stats = view.statistics;
        self.last_update = view.last_update;
    }

    fn start_load(&mut self) -> Result<(), AppError> {
        self.error = None;
        self.stats.clear();
        self.last_update = "Loading...".to_string();
        self.status = format!("Loading {}...", self.indicator);
        self.runner
            .request(LoadRequest::new(self.indicator.clone(), self.year_count))
    }

    fn show_error(&mut self, err: &AppError) {
        warn!(%err, "load failed");
        self.error = Some(format!("Error loading data: {err}"));
    }

    fn shutdown(&mut self) {
        self.runner.shutdown();
        self.queue.teardown();
        self.runner.pipeline().clear_cache();
    }

    fn current_indicator(&self) -> Option<Indicator> {
        self.runner.pipeline().registry().find(&self.indicator).cloned()
    }

    fn unit(&self) -> UnitFormat {
        self.current_indicator()
            .map(|i| i.unit)
            .unwrap_or(UnitFormat::Peso)
    }

    fn spinner(&self) -> char {
        let ticks = self.started.elapsed().as_millis() / 100;
        SPINNER[(ticks % SPINNER.len() as u128) as usize]
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(" econ-dash ").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let registry = self.runner.pipeline().registry();
        let busy = self.runner.is_busy();
        let titles: Vec<Line> = registry
            .iter()
            .map(|ind| {
                let mut label = format!("{} {}", ind.glyph, ind.code);
                if busy && ind.code == self.indicator {
                    label.push(' ');
                    label.push(self.spinner());
                }
                Line::from(label)
            })
            .collect();
        let tabs = Tabs::new(titles)
            .select(registry.position(&self.indicator).unwrap_or(0))
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_widget(tabs, rows[0]);

        let title = self
            .current_indicator()
            .map(|i| view_title(&i, self.year_count))
            .unwrap_or_else(|| self.indicator.clone());
        let line = Line::from(vec![
            Span::styled(title, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" | "),
            Span::styled(
                format!("Last update: {}", self.last_update),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), rows[1]);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut area = area;
        if let Some(msg) = &self.error {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(area);
            let banner = Paragraph::new(msg.as_str())
                .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(banner, rows[0]);
            area = rows[1];
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(38)])
            .split(area);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(cols[1]);

        self.draw_chart(frame, cols[0]);
        self.draw_stats(frame, side[0]);
        self.draw_settings(frame, side[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Chart").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(chart) = self.queue.chart() else {
            let msg = Paragraph::new("Loading chart...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let unit = self.unit();
        let (series, x_bounds, y_bounds) = chart_series(chart, Instant::now());
        let (chart_rect, insets) = chart_layout(rows[0]);
        let widget = IndicatorChart {
            series: &series,
            x_bounds,
            y_bounds,
            unit,
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, rows[0], chart_rect, insets, x_bounds, y_bounds, unit);
        }

        let legend: Vec<Span> = chart
            .datasets()
            .iter()
            .flat_map(|ds| {
                let (r, g, b) = palette_color(ds.color_index);
                [
                    Span::styled("■ ", Style::default().fg(Color::Rgb(r, g, b))),
                    Span::raw(format!("{}  ", ds.year)),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(legend)), rows[1]);
    }

    fn draw_stats(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        if self.stats.is_empty() {
            let msg = if self.runner.is_busy() {
                "Loading statistics..."
            } else {
                "No data available."
            };
            lines.push(Line::from(Span::styled(msg, Style::default().fg(Color::Yellow))));
        }
        for stat in &self.stats {
            lines.push(Line::from(Span::styled(
                stat.title.clone(),
                Style::default().fg(Color::Gray),
            )));
            let mut value = vec![Span::styled(
                stat.value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(change) = &stat.change {
                let color = if change.is_positive() { Color::Green } else { Color::Red };
                value.push(Span::raw(" "));
                value.push(Span::styled(format_change(change), Style::default().fg(color)));
            }
            lines.push(Line::from(value));
            if !stat.subtext.is_empty() {
                lines.push(Line::from(Span::styled(
                    stat.subtext.clone(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            lines.push(Line::from(""));
        }

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Statistics").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = vec![
            ListItem::new(format!("Years: {}", self.year_count)),
            ListItem::new(format!("Smooth lines: {}", on_off(self.style.smooth))),
            ListItem::new(format!("Show points: {}", on_off(self.style.show_points))),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/1-0 indicator  ↑/↓ select  ←/→ adjust  s smooth  p points  r reload  c clear cache  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Build drawable series for Plotters, honouring the reveal animation and chart style.
///
/// Y bounds cover every value, revealed or not, so the axis stays put while animating.
fn chart_series(chart: &LineChart, now: Instant) -> (Vec<SeriesPath>, [f64; 2], [f64; 2]) {
    let x_bounds = [0.0, (SLOT_COUNT - 1) as f64];
    let cutoff = chart.revealed(now) * x_bounds[1];
    let style = chart.style();

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let mut series = Vec::with_capacity(chart.datasets().len());

    for ds in chart.datasets() {
        let mut segments = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        let mut markers = Vec::new();

        for (slot, value) in ds.points().iter().enumerate() {
            if let Some(v) = value {
                y_min = y_min.min(*v);
                y_max = y_max.max(*v);
            }
            let x = slot as f64;
            match value {
                Some(v) if x <= cutoff => {
                    current.push((x, *v));
                    if style.show_points {
                        markers.push((x, *v));
                    }
                }
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        if style.smooth {
            segments = segments
                .iter()
                .map(|seg| smooth_path(seg, style.tension(), SMOOTH_STEPS))
                .collect();
        }

        series.push(SeriesPath {
            color: palette_color(ds.color_index),
            segments,
            markers,
        });
    }

    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        let mid = if y_min.is_finite() { y_min } else { 0.5 };
        y_min = mid - 0.5;
        y_max = mid + 0.5;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (series, x_bounds, [y_min - pad, y_max + pad])
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 10,
        right: 2,
        top: 1,
        bottom: 1,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    unit: UnitFormat,
) {
    let style = Style::default().fg(Color::Gray);

    // Month ticks along the bottom; skip labels that would overlap the previous one.
    let y = chart.y + chart.height;
    if y < inner.y + inner.height {
        let mut next_free = chart.x;
        for (slot, name) in month_starts() {
            let u = (slot as f64 - x_bounds[0]) / (x_bounds[1] - x_bounds[0]);
            let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
            let width = name.chars().count() as u16;
            if x < next_free || x + width > chart.x + chart.width {
                continue;
            }
            frame.render_widget(Paragraph::new(name).style(style), Rect { x, y, width, height: 1 });
            next_free = x + width + 1;
        }
    }

    let ticks = 5usize;
    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format_axis(y_val, unit);
        let label_len = label.chars().count() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style).alignment(Alignment::Right),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let y_label = Paragraph::new(unit.symbol())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}
