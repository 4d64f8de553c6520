//! Color theme and glyphs for the TlapalIA TUI.
//!
//! Store colors (hardware-green on slate) by default with an optional
//! high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use tlapal_engine::UiOptions;

mod colors {
    use super::Color;

    // === Backgrounds (slate) ===
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // slate-900
    pub const BG_PANEL: Color = Color::Rgb(30, 41, 59); // slate-800
    pub const BG_HIGHLIGHT: Color = Color::Rgb(51, 65, 85); // slate-700
    pub const BORDER: Color = Color::Rgb(71, 85, 105); // slate-600

    // === Foregrounds ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(241, 245, 249); // slate-100
    pub const TEXT_SECONDARY: Color = Color::Rgb(203, 213, 225); // slate-300
    pub const TEXT_MUTED: Color = Color::Rgb(148, 163, 184); // slate-400

    // === Brand ===
    pub const GREEN: Color = Color::Rgb(22, 163, 74); // green-600
    pub const GREEN_LIGHT: Color = Color::Rgb(74, 222, 128); // green-400
    pub const YELLOW: Color = Color::Rgb(250, 204, 21); // yellow-400
    pub const RED: Color = Color::Rgb(239, 68, 68); // red-500
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub primary_light: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            border: colors::BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            primary: colors::GREEN,
            primary_light: colors::GREEN_LIGHT,
            warning: colors::YELLOW,
            error: colors::RED,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            border: Color::White,
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            primary: Color::Green,
            primary_light: Color::LightGreen,
            warning: Color::Yellow,
            error: Color::LightRed,
        }
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

/// ASCII/Unicode glyphs for icons and spinners.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub user: &'static str,
    pub assistant: &'static str,
    pub selected: &'static str,
    pub status_ready: &'static str,
    pub status_missing: &'static str,
    pub warning: &'static str,
    /// One per character of a hidden credential.
    pub mask: char,
    pub spinner_frames: &'static [&'static str],
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_FRAMES_ASCII: &[&str] = &["|", "/", "-", "\\"];

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs {
            user: ">",
            assistant: "*",
            selected: ">",
            status_ready: "*",
            status_missing: "o",
            warning: "!",
            mask: '*',
            spinner_frames: SPINNER_FRAMES_ASCII,
        }
    } else {
        Glyphs {
            user: "○",
            assistant: "◇",
            selected: "▸",
            status_ready: "●",
            status_missing: "○",
            warning: "⚠",
            mask: '•',
            spinner_frames: SPINNER_FRAMES,
        }
    }
}

/// When `reduced_motion` is enabled, returns a static glyph instead of cycling.
#[must_use]
pub fn spinner_frame(tick: usize, options: UiOptions) -> &'static str {
    let frames = glyphs(options).spinner_frames;
    if options.reduced_motion {
        frames[0]
    } else {
        frames[tick % frames.len()]
    }
}

/// Pre-defined styles for common UI elements.
pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn user_name(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary_light)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn assistant_name(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_secondary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn nav_active(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.text_primary)
            .bg(palette.primary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn nav_inactive(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn field_focused(palette: &Palette) -> Style {
        Style::default().fg(palette.primary_light)
    }

    #[must_use]
    pub fn result_value(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.primary_light)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn mode_normal(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.text_secondary)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn mode_insert(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.bg_dark)
            .bg(palette.primary_light)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_hint(palette: &Palette) -> Style {
        Style::default().fg(palette.text_muted)
    }

    #[must_use]
    pub fn key_highlight(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.warning)
            .add_modifier(Modifier::BOLD)
    }
}
