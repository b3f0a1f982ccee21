use std::path::PathBuf;
use std::time::Instant;

use crate::suggest::SuggestionOutcome;
use crate::table::{ResultRow, ResultTable};
use crate::tui::theme::ThemeColors;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
}

pub struct App {
    pub table: ResultTable,
    /// Text sent when asking for a model suggestion, one entry per feature
    pub descriptions: Vec<String>,
    pub sorted: bool,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub needs_suggestion: bool,
    pub suggestion: Option<SuggestionOutcome>,
    pub export_path: PathBuf,
    pub source: Option<String>,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(
        table: ResultTable,
        descriptions: Vec<String>,
        sorted: bool,
        export_path: PathBuf,
        theme: ThemeColors,
    ) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        if !table.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            table,
            descriptions,
            sorted,
            table_state,
            input_mode: InputMode::Normal,
            flash_message: None,
            should_quit: false,
            needs_suggestion: false,
            suggestion: None,
            export_path,
            source: None,
            is_loading: false,
            spinner_frame: 0,
            theme,
        }
    }

    /// Label shown in the title bar, usually the feature file name
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Rows in display order
    pub fn current_rows(&self) -> Vec<&ResultRow> {
        self.table.view(self.sorted)
    }

    pub fn next_row(&mut self) {
        let len = self.table.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.table.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_row(&self) -> Option<&ResultRow> {
        let rows = self.current_rows();
        self.table_state.selected().and_then(|i| rows.get(i).copied())
    }

    /// Switch between entry order and ranked order, keeping the selected feature selected
    pub fn toggle_sort(&mut self) {
        let selected = self.selected_row().map(|row| row as *const ResultRow);
        self.sorted = !self.sorted;

        if let Some(ptr) = selected {
            let idx = self
                .current_rows()
                .iter()
                .position(|row| std::ptr::eq(*row, ptr));
            self.table_state.select(idx.or(Some(0)));
        }

        let order = if self.sorted { "ranked by priority" } else { "in entry order" };
        self.show_flash(format!("Showing features {}", order));
    }

    /// Write the table, in the order currently shown, to the export path
    pub fn export(&mut self) {
        match crate::export::write_csv(&self.export_path, &self.table, self.sorted) {
            Ok(()) => self.show_flash(format!(
                "Exported {} rows to {}",
                self.table.len(),
                self.export_path.display()
            )),
            Err(e) => self.show_flash(format!("Failed to export: {:#}", e)),
        }
    }

    pub fn request_suggestion(&mut self) {
        if self.is_loading {
            return;
        }
        self.needs_suggestion = true;
    }

    pub fn set_suggestion(&mut self, outcome: SuggestionOutcome) {
        self.show_flash(outcome.to_string());
        self.suggestion = Some(outcome);
        self.is_loading = false;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Model, Priority};

    fn app(export_path: PathBuf) -> App {
        let table: ResultTable = vec![
            ResultRow::new("Low", Model::Ice, Priority::Real(2.0)),
            ResultRow::new("Must", Model::Moscow, Priority::Label("Must Have".to_string())),
            ResultRow::new("High", Model::Ice, Priority::Real(90.0)),
        ]
        .into_iter()
        .collect();
        App::new(table, Vec::new(), false, export_path, ThemeColors::dark())
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app(PathBuf::from("out.csv"));
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(2));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.next_row();
        assert_eq!(app.selected_row().unwrap().feature_name, "Must");
    }

    #[test]
    fn test_empty_table_has_no_selection() {
        let mut app = App::new(
            ResultTable::new(),
            Vec::new(),
            false,
            PathBuf::from("out.csv"),
            ThemeColors::dark(),
        );
        app.next_row();
        assert!(app.selected_row().is_none());
    }

    #[test]
    fn test_toggle_sort_keeps_selection() {
        let mut app = app(PathBuf::from("out.csv"));
        app.table_state.select(Some(2)); // "High"

        app.toggle_sort();
        assert!(app.sorted);
        let names: Vec<&str> = app.current_rows().iter().map(|r| r.feature_name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low", "Must"]);
        assert_eq!(app.selected_row().unwrap().feature_name, "High");

        app.toggle_sort();
        assert!(!app.sorted);
        assert_eq!(app.selected_row().unwrap().feature_name, "High");
        assert_eq!(app.table_state.selected(), Some(2));
    }

    #[test]
    fn test_export_uses_display_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut app = app(path.clone());
        app.sorted = true;

        app.export();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Feature Name,Model,Priority\nHigh,ICE,90.0\nLow,ICE,2.0\nMust,MoSCoW,Must Have\n"
        );
        let (msg, _) = app.flash_message.unwrap();
        assert!(msg.starts_with("Exported 3 rows"));
    }

    #[test]
    fn test_export_failure_is_flashed() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be replaced by the export file
        let mut app = app(dir.path().to_path_buf());
        app.export();
        let (msg, _) = app.flash_message.unwrap();
        assert!(msg.starts_with("Failed to export"));
    }

    #[test]
    fn test_suggestion_flow() {
        let mut app = app(PathBuf::from("out.csv"));
        app.request_suggestion();
        assert!(app.needs_suggestion);

        app.is_loading = true;
        app.set_suggestion(SuggestionOutcome::Suggested("RICE".to_string()));
        assert!(!app.is_loading);
        assert_eq!(app.suggestion, Some(SuggestionOutcome::Suggested("RICE".to_string())));
        assert_eq!(app.flash_message.unwrap().0, "Suggested prioritization model: RICE");
    }

    #[test]
    fn test_help_mode() {
        let mut app = app(PathBuf::from("out.csv"));
        app.show_help();
        assert_eq!(app.input_mode, InputMode::Help);
        app.dismiss_help();
        assert_eq!(app.input_mode, InputMode::Normal);
    }
}
