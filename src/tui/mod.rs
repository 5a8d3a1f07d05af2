//! Terminal browser: course list, course pages and the exam file rows.

mod app;
mod ui;

use crate::session::Location;
use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Longest wait for input before redrawing
const TICK: Duration = Duration::from_millis(100);

pub fn run(
    root: PathBuf,
    location: Location,
    initial_query: Option<String>,
    debounce: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.clear()?;

    // Create app state (instant - catalog loads in background)
    let mut app = App::new(root, location, debounce);

    // Remembered by the page and applied as soon as its list is built
    if let Some(query) = initial_query {
        for c in query.chars() {
            app.push_char(c);
        }
        app.confirm();
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Check for background fetch completion (non-blocking)
        app.poll_load()?;
        app.poll_debounce();

        terminal.draw(|f| ui::draw(f, app))?;

        // Wake up in time for a pending debounced query
        if !event::poll(app.poll_timeout(TICK))? {
            continue;
        }

        // Only handle key press events, not release or repeat
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::CONTROL, KeyCode::Char('q')) => return Ok(()),
            _ => {}
        }

        match app.mode {
            // In help mode, any key closes help
            app::Mode::Help => app.hide_help(),
            app::Mode::Search => match (key.modifiers, key.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('j'))
                | (KeyModifiers::CONTROL, KeyCode::Char('n')) => app.select_next(),
                (KeyModifiers::CONTROL, KeyCode::Char('k'))
                | (KeyModifiers::CONTROL, KeyCode::Char('p')) => app.select_prev(),
                (KeyModifiers::CONTROL, KeyCode::Char('d')) => app.select_page_down(),
                (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.select_page_up(),
                (KeyModifiers::CONTROL, KeyCode::Char('w')) => app.delete_word(),
                (KeyModifiers::CONTROL, KeyCode::Char('h')) => app.pop_char(),
                (KeyModifiers::CONTROL, KeyCode::Char('a')) => app.select_first(),
                (KeyModifiers::CONTROL, KeyCode::Char('e')) => app.select_last(),
                (KeyModifiers::CONTROL, KeyCode::Char('o')) => app.activate(),
                (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                    KeyCode::Esc => {
                        if !app.query.is_empty() {
                            app.clear_query();
                        } else if !app.back() {
                            return Ok(());
                        }
                    }
                    // Searches immediately; the keystroke goes no further
                    KeyCode::Enter => app.confirm(),
                    KeyCode::Right => app.activate(),
                    KeyCode::Left => {
                        app.back();
                    }
                    KeyCode::Down | KeyCode::Tab => app.select_next(),
                    KeyCode::Up | KeyCode::BackTab => app.select_prev(),
                    KeyCode::PageDown => app.select_page_down(),
                    KeyCode::PageUp => app.select_page_up(),
                    KeyCode::Home => app.select_first(),
                    KeyCode::End => app.select_last(),
                    KeyCode::F(1) => app.show_help(),
                    KeyCode::Char(c) => app.push_char(c),
                    KeyCode::Backspace => app.pop_char(),
                    _ => {}
                },
                _ => {}
            },
        }
    }
}
