pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::suggest::{suggest_best_effort, HttpSuggester, SuggestionOutcome};

/// Run the results viewer until the user quits.
///
/// `suggester` is `None` when no suggestion service is configured; the `a`
/// key then reports that suggestions are unavailable.
pub async fn run_tui(mut app: App, suggester: Option<HttpSuggester>) -> anyhow::Result<()> {
    // Buffer log output while the TUI owns the terminal
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let mut pending_suggestion: Option<tokio::task::JoinHandle<SuggestionOutcome>> = None;

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(anyhow::Error::from(e));
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
        }

        // Collect a finished suggestion
        if let Some(handle) = pending_suggestion.take_if(|h| h.is_finished()) {
            match handle.await {
                Ok(outcome) => app.set_suggestion(outcome),
                Err(e) => {
                    app.is_loading = false;
                    app.show_flash(format!("Failed to get suggestion: {}", e));
                }
            }
        }

        if app.needs_suggestion && pending_suggestion.is_none() {
            app.needs_suggestion = false;
            match &suggester {
                Some(s) => {
                    let s = s.clone();
                    let descriptions = app.descriptions.clone();
                    pending_suggestion = Some(tokio::spawn(async move {
                        let timeout = s.timeout();
                        suggest_best_effort(&s, &descriptions, timeout).await
                    }));
                    app.is_loading = true;
                }
                None => app.set_suggestion(SuggestionOutcome::Unavailable(
                    "no suggestion service configured".to_string(),
                )),
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    if let Some(handle) = pending_suggestion {
        handle.abort();
    }

    ratatui::restore();

    // Flush buffered log output now that the terminal is restored
    crate::stderr_buffer::flush();

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            KeyCode::Char('s') => app.toggle_sort(),
            KeyCode::Char('e') => app.export(),
            KeyCode::Char('a') => app.request_suggestion(),

            KeyCode::Char('?') => app.show_help(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
