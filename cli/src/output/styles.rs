//! Output styles using owo-colors stylesheet pattern

use owo_colors::Style;

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Dimmed/secondary text
    pub dim: Style,
    /// Progress group headings
    pub group: Style,
    /// Headers/section titles
    pub header: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.dim = Style::new().dimmed();
        self.group = Style::new().bold();
        self.header = Style::new().bold().cyan();
    }
}
