//! Presentation options shared by the engine and the renderer.

/// Accessibility and rendering switches read from `[app]` in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiOptions {
    /// Use ASCII-only glyphs for icons and spinners.
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    pub high_contrast: bool,
    /// Freeze the spinner on its first frame.
    pub reduced_motion: bool,
}
