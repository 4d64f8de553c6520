//! UI-facing state for the engine.

mod input;

pub use input::{DraftInput, InputMode};
pub use tlapal_types::ui::UiOptions;

/// The three panels of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chat,
    Calculators,
    Settings,
}

impl Tab {
    pub const ALL: [Self; 3] = [Self::Chat, Self::Calculators, Self::Settings];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Chat => "Asistente Virtual",
            Self::Calculators => "Calculadoras",
            Self::Settings => "Ajustes API",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Chat => 0,
            Self::Calculators => 1,
            Self::Settings => 2,
        }
    }

    /// Tab bound to a number key (`'1'` to `'3'`).
    #[must_use]
    pub fn from_digit(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
