use crate::tui::app::{App, Mode, Row};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(5),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_query_input(f, app, chunks[0]);
    draw_results_list(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.mode == Mode::Help {
        draw_help(f, f.area());
    }
}

fn draw_query_input(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.course.is_some() {
        " Search exams (Enter: search, Right: open, Left: courses, F1: help) "
    } else {
        " Search courses (Enter: search, Right: open, Esc: quit, F1: help) "
    };

    let input = Paragraph::new(app.query.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(input, area);

    if app.mode == Mode::Search {
        let width = app.query.chars().count() as u16;
        f.set_cursor_position((area.x + width + 1, area.y + 1));
    }
}

fn draw_results_list(f: &mut Frame, app: &App, area: Rect) {
    let rows = app.rows();
    let items: Vec<ListItem> = rows.iter().map(row_item).collect();

    let title = match &app.course {
        Some(course) => format!(
            " {} {} ({}/{}) ",
            course.code().to_uppercase(),
            course.name().unwrap_or_default(),
            course.results().len(),
            course.exam_count()
        ),
        None => format!(" Courses ({}) ", app.index.results().len()),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn row_item<'a>(row: &Row<'a>) -> ListItem<'a> {
    let line = match row {
        Row::Course(entry) => Line::from(vec![
            Span::styled(
                format!("{:<10}", entry.display_code()),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::raw(entry.name.as_str()),
        ]),
        Row::Exam { exam, expanded } => {
            let marker = if *expanded { "▾" } else { "▸" };
            Line::from(vec![
                Span::raw(format!("{} ", marker)),
                Span::styled(exam.term(), Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::styled(
                    exam.title_or_placeholder(),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("  {}", exam.author_or_placeholder()),
                    Style::default().fg(Color::Blue),
                ),
                Span::styled(
                    format!("  [{}]", exam.id),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        Row::File(file) => Line::from(vec![
            Span::raw("    "),
            Span::styled(file.label(), Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(file.path.clone(), Style::default().fg(Color::DarkGray)),
        ]),
    };
    ListItem::new(line)
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let spinner = if app.is_loading() { "⏳ " } else { "" };
    let text = format!("{}{}  {}", spinner, app.location(), app.status_message);
    let status = Paragraph::new(text).style(Style::default().fg(Color::Cyan));

    f.render_widget(status, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("  type          filter the list (after a short pause)"),
        Line::from("  Enter         filter now"),
        Line::from("  Up/Down       move the highlight"),
        Line::from("  PgUp/PgDn     move by ten rows"),
        Line::from("  Right/Ctrl+O  open course, toggle exam, open file"),
        Line::from("  Left          back to the course list"),
        Line::from("  Ctrl+W        delete word"),
        Line::from("  Esc           clear query, back, quit"),
        Line::from("  Ctrl+C        quit"),
    ];

    let popup = centered(area, 60, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help ")),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
