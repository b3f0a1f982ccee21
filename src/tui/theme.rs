//! Centralized theme module for TUI colors and styles

use ratatui::prelude::*;

use crate::config::ThemeMode;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Priority colors (traffic light pattern, relative to the top score)
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,
    pub bar_empty: Color,

    // MoSCoW label colors, indexed by rank - 1
    pub moscow: [Color; 4],

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub model_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,
    pub flash_info: Color,

    // Popup overlay colors
    pub popup_key: Color,
    pub spinner: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            bar_empty: Color::DarkGray,
            moscow: [Color::Green, Color::Cyan, Color::Yellow, Color::DarkGray],
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            model_color: Color::Cyan,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            flash_info: Color::White,
            popup_key: Color::Cyan,
            spinner: Color::Cyan,
        }
    }

    pub fn light() -> Self {
        Self {
            score_high: Color::Rgb(0, 128, 0),
            score_mid: Color::Rgb(176, 112, 0),
            score_low: Color::Rgb(192, 0, 0),
            bar_empty: Color::Indexed(250),
            moscow: [
                Color::Rgb(0, 128, 0),
                Color::Blue,
                Color::Rgb(176, 112, 0),
                Color::Indexed(244),
            ],
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Indexed(244),
            model_color: Color::Blue,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Indexed(240),
            title_color: Color::Blue,
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 128, 0),
            flash_error: Color::Rgb(192, 0, 0),
            flash_info: Color::Black,
            popup_key: Color::Blue,
            spinner: Color::Blue,
        }
    }

    /// Color for a score based on its percentage of the highest score shown
    pub fn score_color(&self, score: f64, max_score: f64) -> Color {
        let percentage = if max_score > 0.0 {
            (score / max_score) * 100.0
        } else {
            0.0
        };

        if percentage >= 70.0 {
            self.score_high
        } else if percentage >= 40.0 {
            self.score_mid
        } else {
            self.score_low
        }
    }

    /// Color for a MoSCoW rank; unknown ranks share the "Won't Have" color
    pub fn moscow_color(&self, rank: u8) -> Color {
        let idx = usize::from(rank.clamp(1, 4)) - 1;
        self.moscow[idx]
    }
}

/// Pick the palette for `mode`. `Auto` asks the terminal for its background
/// luminance and falls back to dark when it cannot tell.
///
/// Must run before the terminal enters raw mode / the alternate screen.
pub fn resolve_theme(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => {
                tracing::debug!("Terminal background luma {:.2}, using light theme", luma);
                ThemeColors::light()
            }
            Ok(luma) => {
                tracing::debug!("Terminal background luma {:.2}, using dark theme", luma);
                ThemeColors::dark()
            }
            Err(e) => {
                tracing::debug!("Could not detect terminal background ({}), using dark theme", e);
                ThemeColors::dark()
            }
        },
    }
}
