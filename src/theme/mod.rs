//! Theme system for human-mode output.

use console::Style;

/// Visual theme for Nivasa human-mode output.
///
/// Centralizes colors and styles for consistent rendering.
pub struct NivasaTheme {
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub slot_index: Style,
    pub snap: Style,
    pub placeholder: Style,
}

impl Default for NivasaTheme {
    fn default() -> Self {
        Self {
            accent: Style::new().blue().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            muted: Style::new().dim(),
            header: Style::new().blue().bold().underlined(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            slot_index: Style::new().yellow().bold(),
            snap: Style::new().green(),
            placeholder: Style::new().dim().italic(),
        }
    }
}
