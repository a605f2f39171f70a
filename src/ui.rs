pub mod charting;

use learneng::{
    app::{App, AppState},
    clock::Clock,
    engine::CharState,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// One frame of the app.
pub struct View<'a, C: Clock> {
    pub app: &'a App<C>,
    pub tick_secs: f64,
}

impl<C: Clock> Widget for View<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.app.state {
            AppState::Typing => render_typing(&self, area, buf),
            AppState::Results => render_results(self.app, area, buf),
        }
    }
}

fn render_typing<C: Clock>(view: &View<'_, C>, area: Rect, buf: &mut Buffer) {
    let engine = &view.app.engine;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let item = engine.current_item().unwrap_or_default();
    let prompt_lines = if item.width() <= max_chars_per_line as usize {
        1
    } else {
        (item.width() as f64 / max_chars_per_line as f64).ceil() as u16 + 1
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),            // section header
            Constraint::Length(1),            // live stats
            Constraint::Length(1),            // padding
            Constraint::Length(prompt_lines), // item
            Constraint::Length(1),            // padding
            Constraint::Min(3),               // wpm chart
            Constraint::Length(1),            // help
        ])
        .split(area);

    let header = format!(
        "{} · item {}/{}",
        engine.active_section(),
        (engine.session().current_item_index + 1).min(engine.item_count()),
        engine.item_count()
    );
    Paragraph::new(Span::styled(header, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let stats = format!(
        "{} wpm   {}% acc",
        engine.live_wpm(),
        engine.live_accuracy()
    );
    Paragraph::new(Span::styled(stats, dim_bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let spans: Vec<Span> = engine
        .char_states()
        .into_iter()
        .map(|(c, state)| match state {
            CharState::Correct => Span::styled(c.to_string(), green_bold_style),
            CharState::Incorrect => Span::styled(
                match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            CharState::Cursor => Span::styled(c.to_string(), underlined_dim_bold_style),
            CharState::Pending => Span::styled(c.to_string(), dim_bold_style),
        })
        .collect();

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    let points = charting::history_points(engine.wpm_history(), view.tick_secs);
    let (duration, y_max) = charting::compute_chart_params(&points);
    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];
    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .bounds([0.0, duration])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(charting::format_label(duration)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(charting::format_label(y_max))]),
        )
        .render(chunks[5], buf);

    Paragraph::new(Span::styled(
        "(tab) next section / (esc) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[6], buf);
}

fn render_results<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let results = app.engine.results();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(results.len() as u16 + 3), // table
            Constraint::Length(1),                        // overall
            Constraint::Length(1),                        // submit error
            Constraint::Min(0),
            Constraint::Length(1), // help
        ])
        .split(area);

    let header = Row::new(vec![
        "section",
        "wpm",
        "accuracy",
        "time",
        "characters",
        "consistency",
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows = results.iter().map(|r| {
        Row::new(vec![
            r.section.to_string(),
            r.result.wpm.to_string(),
            format!("{}%", r.result.accuracy),
            format!("{}s", r.result.time),
            r.result.characters.clone(),
            format!("{}%", r.result.consistency),
        ])
    });

    Table::new(rows, [Constraint::Ratio(1, 6); 6])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Results"))
        .render(chunks[0], buf);

    let overall = app
        .engine
        .report()
        .map(|report| format!("overall {:.1}", report.overall))
        .unwrap_or_default();
    Paragraph::new(Span::styled(
        overall,
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    if let Some(err) = &app.last_error {
        Paragraph::new(Span::styled(
            format!("could not save results: {err}"),
            Style::default().fg(Color::Red),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    }

    Paragraph::new(Span::styled(
        "(r)estart / (esc) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}
