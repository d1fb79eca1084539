//! # Palette
//!
//! Colors used by the HygieAI TUI, grouped by semantic role. Rendering code
//! references these fields instead of hardcoding `ratatui::style::Color`
//! values.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Main background color for panels.
    pub bg: Color,
    /// Primary text color.
    pub fg: Color,
    /// Muted text (hints, timestamps, footer).
    pub fg_dim: Color,
    /// Brand color: logo, focused borders, headings.
    pub accent: Color,
    /// Highlight for selected cards and inline code.
    pub secondary: Color,
    /// Border and name color for the user's messages.
    pub user: Color,
    /// Border and name color for the assistant's messages.
    pub bot: Color,
    /// Notices and apologies.
    pub error: Color,
}

impl Theme {
    pub fn hygieai() -> &'static Theme {
        &HYGIEAI
    }
}

static HYGIEAI: Theme = Theme {
    bg: Color::Rgb(18, 24, 38),
    fg: Color::Rgb(226, 232, 240),
    fg_dim: Color::Rgb(100, 116, 139),
    accent: Color::Rgb(45, 212, 191),     // teal
    secondary: Color::Rgb(251, 191, 36),  // amber
    user: Color::Rgb(96, 165, 250),       // blue
    bot: Color::Rgb(45, 212, 191),        // teal
    error: Color::Rgb(248, 113, 113),     // red
};
