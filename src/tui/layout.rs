//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, Gauge, Paragraph, Wrap};

use super::runtime::App;
use super::style;
use crate::recommend::Priority;
use crate::tariff::CURRENCY_SYMBOL;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // efficiency gauges
            Constraint::Min(10),   // trace + weekly charts
            Constraint::Length(8), // recommendations
            Constraint::Length(3), // status
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_gauges(frame, app, chunks[1]);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    render_trace(frame, app, charts[0]);
    render_weekly(frame, app, charts[1]);

    render_recommendations(frame, app, chunks[3]);
    render_status(frame, app, chunks[4]);
    render_footer(frame, chunks[5]);
}

/// Header bar: brand, preset, clock and headline metrics.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let clock = &app.view.clock;
    let s = &app.view.summary;
    let header = Line::from(vec![
        Span::styled(
            " GREENSENSE ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(app.preset_label, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " │ {} {:02}:00 m{} │ {:.2} kW │ {CURRENCY_SYMBOL}{:.2}/h │ avg {:.1}% │ week {:.0} kWh ",
            clock.day_label(),
            clock.hour(),
            clock.month(),
            s.current_kw,
            s.hourly_cost,
            s.average_efficiency_percent,
            s.weekly_total_kwh,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// One gauge per sub-system, colored against its reference level.
fn render_gauges(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    for (row, chunk) in app.view.comparison.iter().zip(chunks.iter()) {
        let color = style::efficiency_color(row.current_percent, row.optimal_percent);
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(format!(" {} (opt {:.0}%) ", row.subsystem, row.optimal_percent))
                    .borders(Borders::ALL),
            )
            .gauge_style(Style::default().fg(color))
            .ratio((row.current_percent / 100.0).clamp(0.0, 1.0))
            .label(format!("{:.1}%", row.current_percent));
        frame.render_widget(gauge, *chunk);
    }
}

/// 24-hour consumption trace, oldest hour on the left.
fn render_trace(frame: &mut Frame, app: &App, area: Rect) {
    let data: Vec<(f64, f64)> = app
        .view
        .trace
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.consumption_kw))
        .collect();

    let y_bounds = style::auto_bounds_y(&data);
    let x_hi = data.len().saturating_sub(1).max(1) as f64;

    let first_hour = app.view.trace.first().map_or(0, |p| p.hour);
    let last_hour = app.view.trace.last().map_or(0, |p| p.hour);

    let datasets = vec![
        Dataset::default()
            .name("Predicted")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::TRACE_COLOR))
            .data(&data),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Last 24 Hours ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("hour")
                .bounds([0.0, x_hi])
                .labels(vec![format!("{first_hour:02}h"), format!("{last_hour:02}h")]),
        )
        .y_axis(
            Axis::default()
                .title("kW")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Seven-day forecast bars (kWh).
fn render_weekly(frame: &mut Frame, app: &App, area: Rect) {
    let bars: Vec<(&str, u64)> = app
        .view
        .weekly
        .iter()
        .map(|d| (d.day, d.predicted_kwh.round() as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(" Weekly Forecast (kWh) ")
                .borders(Borders::ALL),
        )
        .data(bars.as_slice())
        .bar_width(4)
        .bar_gap(1)
        .bar_style(Style::default().fg(style::WEEKLY_BAR));

    frame.render_widget(chart, area);
}

/// Current recommendations with their hotkeys.
fn render_recommendations(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = if app.view.recommendations.is_empty() {
        vec![Line::from("  No recommendations. Everything looks efficient.")]
    } else {
        app.view
            .recommendations
            .iter()
            .zip(['a', 'b', 'c'])
            .flat_map(|(rec, key)| {
                let marker = match rec.priority {
                    Priority::High => Style::default()
                        .fg(style::PRIORITY_HIGH)
                        .add_modifier(Modifier::BOLD),
                    Priority::Medium => Style::default().add_modifier(Modifier::BOLD),
                };
                [
                    Line::from(vec![
                        Span::raw(format!("  [{key}] ")),
                        Span::styled(rec.title, marker),
                        Span::raw(format!(
                            "  save {CURRENCY_SYMBOL}{:.0}/month, {:.1} kg CO2",
                            rec.monthly_savings, rec.carbon_savings_kg
                        )),
                    ]),
                    Line::from(format!("      {}", rec.description)),
                ]
            })
            .collect()
    };

    let block = Block::default()
        .title(" Recommendations ")
        .borders(Borders::ALL);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Latest narration line.
fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title(" Status ").borders(Borders::ALL);
    let paragraph = Paragraph::new(Line::from(format!("  {}", app.status))).block(block);
    frame.render_widget(paragraph, area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  1/2/3:Default/High/Optimal  a/b/c:Apply  r:Resample",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
