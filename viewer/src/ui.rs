use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use shared::{CellState, GridSnapshot, ParamName, PhasePoint, PopulationSample};
use sim::TickReport;

const PREY_COLOR: Color = Color::Green;
const PREDATOR_COLOR: Color = Color::Red;
const EMPTY_COLOR: Color = Color::White;

pub fn draw(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.size());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(ParamName::ALL.len() as u16 + 2),
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(main[1]);

    draw_grid(f, app, main[0]);
    draw_params(f, app, right[0]);
    draw_time_series(f, &app.sim().time_series(), right[1]);
    draw_phase_portrait(f, &app.sim().phase_portrait(), right[2]);
    draw_status(f, app, outer[1]);
}

/// Upper bound for a percentage axis: the next multiple of ten above `max`
pub fn axis_ceiling(max: f64) -> f64 {
    ((max / 10.0).floor() + 1.0) * 10.0
}

fn cell_span(cell: CellState) -> Span<'static> {
    let color = match cell {
        CellState::Empty => EMPTY_COLOR,
        CellState::Prey => PREY_COLOR,
        CellState::Predator => PREDATOR_COLOR,
    };
    Span::styled("█", Style::default().fg(color))
}

/// Render the part of the grid that fits into `width` x `height` characters
pub fn grid_lines(snapshot: &GridSnapshot, width: usize, height: usize) -> Vec<Line<'static>> {
    snapshot
        .rows()
        .take(height)
        .map(|row| {
            let spans: Vec<_> = row.iter().take(width).map(|&cell| cell_span(cell)).collect();
            Line::from(spans)
        })
        .collect()
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let snapshot = app.sim().grid_snapshot();
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    let title = if snapshot.size > inner_width || snapshot.size > inner_height {
        format!("World {0}x{0} (clipped)", snapshot.size)
    } else {
        format!("World {0}x{0}", snapshot.size)
    };

    let paragraph = Paragraph::new(grid_lines(&snapshot, inner_width, inner_height))
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

fn draw_params(f: &mut Frame, app: &App, area: Rect) {
    let params = app.sim().params();
    let lines: Vec<Line> = ParamName::ALL
        .into_iter()
        .map(|name| {
            let selected = name == app.selected();
            let marker = if selected { "> " } else { "  " };
            let value = if name.is_integer() {
                format!("{:.0}", params.get(name))
            } else {
                format!("{:.3}", params.get(name))
            };

            let mut style = Style::default();
            if !app.is_editable(name) {
                style = style.fg(Color::DarkGray);
            }
            if selected {
                style = style.add_modifier(Modifier::BOLD);
            }
            Line::from(Span::styled(
                format!("{marker}{:<22}{value:>8}", name.label()),
                style,
            ))
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Parameters [Up/Down select | Left/Right adjust | Shift fine]"),
    );
    f.render_widget(paragraph, area);
}

fn axis_labels(max: f64) -> Vec<Span<'static>> {
    vec![
        Span::raw("0"),
        Span::raw(format!("{:.0}", max / 2.0)),
        Span::raw(format!("{:.0}", max)),
    ]
}

fn draw_time_series(f: &mut Frame, samples: &[PopulationSample], area: Rect) {
    let prey: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.tick_index as f64, s.prey_percent))
        .collect();
    let predator: Vec<(f64, f64)> = samples
        .iter()
        .map(|s| (s.tick_index as f64, s.predator_percent))
        .collect();

    let peak = samples
        .iter()
        .map(|s| s.prey_percent.max(s.predator_percent))
        .fold(0.0, f64::max);
    let y_max = axis_ceiling(peak);
    let x_max = shared::HISTORY_CAPACITY as f64;

    let datasets = vec![
        Dataset::default()
            .name("Rabbits")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(PREY_COLOR))
            .data(&prey),
        Dataset::default()
            .name("Foxes")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(PREDATOR_COLOR))
            .data(&predator),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Population [%]"))
        .x_axis(
            Axis::default()
                .title("Tick")
                .bounds([0.0, x_max])
                .labels(axis_labels(x_max)),
        )
        .y_axis(Axis::default().bounds([0.0, y_max]).labels(axis_labels(y_max)));
    f.render_widget(chart, area);
}

fn draw_phase_portrait(f: &mut Frame, points: &[PhasePoint], area: Rect) {
    let data: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.prey_percent, p.predator_percent))
        .collect();

    let x_max = axis_ceiling(points.iter().map(|p| p.prey_percent).fold(0.0, f64::max));
    let y_max = axis_ceiling(points.iter().map(|p| p.predator_percent).fold(0.0, f64::max));

    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::Yellow))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Phase portrait"))
        .x_axis(
            Axis::default()
                .title("Rabbits [%]")
                .bounds([0.0, x_max])
                .labels(axis_labels(x_max)),
        )
        .y_axis(
            Axis::default()
                .title("Foxes [%]")
                .bounds([0.0, y_max])
                .labels(axis_labels(y_max)),
        );
    f.render_widget(chart, area);
}

/// Event counts of the last tick, e.g. `+3 rabbits, 2 eaten, +1/-0 foxes`
pub fn tick_events(report: &TickReport) -> String {
    format!(
        "+{} rabbits, {} eaten, +{}/-{} foxes",
        report.prey_births, report.prey_eaten, report.predator_births, report.predator_deaths
    )
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let (prey, predator) = app.sim().population();
    let line = Line::from(vec![
        Span::raw(format!("Tick {} | ", app.sim().tick())),
        Span::styled(format!("{prey} rabbits"), Style::default().fg(PREY_COLOR)),
        Span::raw(" | "),
        Span::styled(format!("{predator} foxes"), Style::default().fg(PREDATOR_COLOR)),
        Span::raw(format!(" | {}", tick_events(&app.sim().last_report()))),
        Span::raw(format!(" | {}", app.status())),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("[Space: Start/Stop | s: Step | r: Reset | q: Quit]"),
    );
    f.render_widget(paragraph, area);
}
