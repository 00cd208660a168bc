//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Row, Table};

use super::runtime::App;
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // peak gauge
            Constraint::Length(4), // summary panel
            Constraint::Min(5),    // readings table
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_peak_gauge(frame, app, chunks[1]);
    render_summary(frame, app, chunks[2]);
    render_table(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: prefix, meter count, refresh rate, run state.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_icon, state_label) = if !app.is_running() {
        ("■", "STOPPED")
    } else if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "LIVE")
    };
    let filter = app.filter.map_or("all", |s| s.as_str());

    let header = Line::from(vec![
        Span::styled(
            " METER-SIM ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{}-*", app.prefix()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ meters={} │ filter={} │ {}ms │ {} {} ",
            app.summary.device_count,
            filter,
            app.refresh_interval_ms(),
            state_icon,
            state_label,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Share of meters currently at peak.
fn render_peak_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let share = if app.summary.device_count == 0 {
        0.0
    } else {
        app.summary.peak_count as f64 / app.summary.device_count as f64
    };
    let gauge = Gauge::default()
        .block(Block::default().title(" Peak share ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(style::peak_share_color(share)))
        .ratio(share.clamp(0.0, 1.0))
        .label(format!(
            "{}/{} ({:.0}%)",
            app.summary.peak_count,
            app.summary.device_count,
            share * 100.0
        ));
    frame.render_widget(gauge, area);
}

/// Fleet aggregates over the whole snapshot.
fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let s = &app.summary;
    let lines = vec![
        Line::from(format!(
            "  normal={:>5}  peak={:>5}  maintenance={:>5}",
            s.normal_count, s.peak_count, s.maintenance_count,
        )),
        Line::from(format!(
            "  total={:>9.2} kWh  mean={:>6.2} kWh  max={:>6.2} kWh",
            s.total_kwh, s.mean_kwh, s.max_kwh,
        )),
    ];
    let block = Block::default().title(" Summary ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Latest reading of every visible meter, colored by status.
fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    // Two border rows and one header row.
    let visible = usize::from(area.height.saturating_sub(3));
    let rows: Vec<Row> = app
        .rows
        .iter()
        .skip(app.scroll)
        .take(visible)
        .map(|r| {
            Row::new(vec![
                r.device_id.clone(),
                r.timestamp.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
                format!("{:>8.2}", r.value),
                r.unit.clone(),
                r.status.to_string(),
            ])
            .style(Style::default().fg(style::status_color(r.status)))
        })
        .collect();

    let header = Row::new(vec!["Device", "Timestamp", "Value", "Unit", "Status"]).style(
        Style::default()
            .fg(style::COLUMN_FG)
            .add_modifier(Modifier::BOLD),
    );

    let title = if app.rows.is_empty() {
        " Readings (waiting for first tick...) ".to_string()
    } else {
        format!(
            " Readings {}-{} of {} ",
            app.scroll + 1,
            (app.scroll + visible).min(app.rows.len()),
            app.rows.len()
        )
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(27),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Min(11),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL));

    frame.render_widget(table, area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  +/-:Refresh  f:Filter  r:Refresh now  ↑/↓:Scroll",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
