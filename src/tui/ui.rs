use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};

use crate::scoring::{format_decimal, Priority};
use crate::suggest::SuggestionOutcome;
use crate::tui::app::{App, InputMode};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    let suggestion_height = if app.suggestion.is_some() { 1 } else { 0 };

    // Layout: Title(1) + Table(fill) + Suggestion(0/1) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(suggestion_height),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_table(frame, chunks[1], app);
    if app.suggestion.is_some() {
        render_suggestion(frame, chunks[2], app);
    }
    render_status_bar(frame, chunks[3], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, &app.theme);
    }

    // Loading overlay goes on top of everything
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let left = "Prio Bro";
    let mut spans = vec![Span::styled(left, Style::default().fg(app.theme.title_color).bold())];

    if let Some(ref source) = app.source {
        let left_len = left.len();
        let right_len = source.chars().count();
        let padding_len = (area.width as usize).saturating_sub(left_len + right_len);
        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(source.clone(), Style::default().fg(app.theme.muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let view = app.table.view(app.sorted);

    if view.is_empty() {
        let empty_msg = Paragraph::new("No features scored")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    // Bars scale against the highest numeric priority on screen
    let max_score = view
        .iter()
        .filter_map(|row| row.priority.as_real())
        .fold(0.0_f64, f64::max);

    let rows: Vec<Row> = view
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let index = format!("{}.", idx + 1);
            let priority_line = priority_cell(&row.priority, max_score, theme);
            let name = truncate_name(&row.feature_name, 60);

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(index).style(Style::default().fg(theme.index_color)),
                Cell::from(priority_line),
                Cell::from(row.model.label()).style(Style::default().fg(theme.model_color)),
                Cell::from(name),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // Index: "99."
        Constraint::Length(20), // Priority + bar: "  36.0 ████░░░░"
        Constraint::Length(16), // Model: "Weighted Scoring"
        Constraint::Fill(1),    // Feature
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Priority", "Model", "Feature"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn priority_cell(priority: &Priority, max_score: f64, theme: &ThemeColors) -> Line<'static> {
    match priority {
        Priority::Real(score) => {
            let color = theme.score_color(*score, max_score);
            let mut spans = vec![Span::styled(
                format!("{:>7} ", format_score(*score)),
                Style::default().fg(color),
            )];
            spans.extend(score_bar(*score, max_score, 10, theme).spans);
            Line::from(spans)
        }
        Priority::Label(label) => {
            let rank = priority.rank().unwrap_or(4);
            Line::from(Span::styled(
                label.clone(),
                Style::default().fg(theme.moscow_color(rank)),
            ))
        }
    }
}

/// Compact score text for the priority column: large values use k/M suffixes
fn format_score(score: f64) -> String {
    if score >= 1_000_000.0 {
        format!("{:.1}M", score / 1_000_000.0).replace(".0M", "M")
    } else if score >= 10_000.0 {
        format!("{:.1}k", score / 1_000.0).replace(".0k", "k")
    } else if score.fract() == 0.0 {
        format_decimal(score)
    } else {
        format!("{:.2}", score)
    }
}

fn score_bar(score: f64, max_score: f64, width: usize, theme: &ThemeColors) -> Line<'static> {
    let ratio = if max_score > 0.0 {
        (score / max_score).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let bar_color = theme.score_color(score, max_score);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(bar_color)));
    }
    if empty > 0 {
        spans.push(Span::styled("░".repeat(empty), Style::default().fg(theme.bar_empty)));
    }

    Line::from(spans)
}

fn truncate_name(name: &str, max_width: usize) -> String {
    crate::output::truncate_name(name, max_width)
}

fn render_suggestion(frame: &mut Frame, area: Rect, app: &App) {
    let Some(ref outcome) = app.suggestion else {
        return;
    };
    let color = match outcome {
        SuggestionOutcome::Suggested(_) => app.theme.flash_success,
        SuggestionOutcome::Unavailable(_) => app.theme.muted,
    };
    let line = Line::from(Span::styled(outcome.to_string(), Style::default().fg(color)));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.contains("unavailable") {
            theme.flash_error
        } else if msg.starts_with("Exported") || msg.starts_with("Suggested") {
            theme.flash_success
        } else {
            theme.flash_info
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let count = format!("{} features", app.table.len());
        let order = if app.sorted { "ranked" } else { "entry order" };

        let hints = [
            ("j", "/", "k", ":nav "),
            ("s", "", "", ":sort "),
            ("e", "", "", ":export "),
            ("a", "", "", ":suggest "),
            ("?", "", "", ":help "),
            ("q", "", "", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(count, Style::default().fg(theme.muted)),
            Span::raw(" "),
            Span::styled(order, Style::default().fg(theme.muted)),
            Span::raw("  "),
        ];
        for (i, (key1, sep, key2, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key1, Style::default().fg(theme.status_key_color)));
            if !sep.is_empty() {
                spans.push(Span::raw(*sep));
                spans.push(Span::styled(*key2, Style::default().fg(theme.status_key_color)));
            }
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect { x, y, width, height }
}

fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 12, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Keyboard Shortcuts ");
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(theme.popup_key).bold();
    let entries = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("s             ", "Toggle ranked / entry order"),
        ("e             ", "Export shown order to CSV"),
        ("a             ", "Ask for a model suggestion"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(40, 3, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];

    let loading_text = Paragraph::new(format!("{} Asking for a suggestion...", spinner))
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.spinner));

    frame.render_widget(loading_text, inner);
}
