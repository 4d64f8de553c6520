//! Calculator panel: concrete and paint forms.
//!
//! The forms hold raw field text. Estimates are computed from that text every
//! time they are read.

use tlapal_core::{ConcreteEstimate, ConcreteInputs, PaintEstimate, PaintInputs, concrete, paint};

use crate::ui::DraftInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalculatorMode {
    #[default]
    Concrete,
    Paint,
}

impl CalculatorMode {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Concrete => "CONCRETO",
            Self::Paint => "PINTURA",
        }
    }

    #[must_use]
    pub const fn fields(self) -> &'static [CalcField] {
        match self {
            Self::Concrete => &[
                CalcField::Length,
                CalcField::Width,
                CalcField::Thickness,
                CalcField::Waste,
            ],
            Self::Paint => &[CalcField::Area, CalcField::Coats, CalcField::Coverage],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcField {
    Length,
    Width,
    Thickness,
    Waste,
    Area,
    Coats,
    Coverage,
}

impl CalcField {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Length => "Largo (metros)",
            Self::Width => "Ancho (metros)",
            Self::Thickness => "Espesor (cm)",
            Self::Waste => "Desperdicio (%)",
            Self::Area => "Area a cubrir (m²)",
            Self::Coats => "Manos",
            Self::Coverage => "Rendimiento (m²/L)",
        }
    }

    /// The coats field is a two-way selector, not free text.
    #[must_use]
    pub const fn is_selector(self) -> bool {
        matches!(self, Self::Coats)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coats {
    One,
    #[default]
    Two,
}

impl Coats {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    #[must_use]
    pub const fn count(self) -> f64 {
        match self {
            Self::One => 1.0,
            Self::Two => 2.0,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::One => "1 Mano",
            Self::Two => "2 Manos",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConcreteForm {
    pub length: DraftInput,
    pub width: DraftInput,
    pub thickness: DraftInput,
    pub waste: DraftInput,
}

impl Default for ConcreteForm {
    fn default() -> Self {
        Self {
            length: DraftInput::default(),
            width: DraftInput::default(),
            thickness: DraftInput::default(),
            waste: DraftInput::with_text("5"),
        }
    }
}

impl ConcreteForm {
    #[must_use]
    pub fn estimate(&self) -> ConcreteEstimate {
        concrete(ConcreteInputs::from_fields(
            self.length.text(),
            self.width.text(),
            self.thickness.text(),
            self.waste.text(),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct PaintForm {
    pub area: DraftInput,
    pub coats: Coats,
    pub coverage: DraftInput,
}

impl Default for PaintForm {
    fn default() -> Self {
        Self {
            area: DraftInput::default(),
            coats: Coats::default(),
            coverage: DraftInput::with_text("10"),
        }
    }
}

impl PaintForm {
    #[must_use]
    pub fn estimate(&self) -> PaintEstimate {
        let mut inputs =
            PaintInputs::from_fields(self.area.text(), "", self.coverage.text());
        inputs.coats = self.coats.count();
        paint(inputs)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CalculatorState {
    mode: CalculatorMode,
    /// Index into `mode.fields()`.
    focus: usize,
    concrete: ConcreteForm,
    paint: PaintForm,
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '-'
}

impl CalculatorState {
    #[must_use]
    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    /// Switch forms. Both keep their values.
    pub fn set_mode(&mut self, mode: CalculatorMode) {
        if self.mode != mode {
            self.mode = mode;
            self.focus = 0;
        }
    }

    #[must_use]
    pub fn focused_field(&self) -> CalcField {
        let fields = self.mode.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.mode.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let len = self.mode.fields().len();
        self.focus = (self.focus + len - 1) % len;
    }

    #[must_use]
    pub fn concrete(&self) -> &ConcreteForm {
        &self.concrete
    }

    #[must_use]
    pub fn paint(&self) -> &PaintForm {
        &self.paint
    }

    #[must_use]
    pub fn concrete_estimate(&self) -> ConcreteEstimate {
        self.concrete.estimate()
    }

    #[must_use]
    pub fn paint_estimate(&self) -> PaintEstimate {
        self.paint.estimate()
    }

    /// Text field for `field`; `None` for the coats selector.
    #[must_use]
    pub fn draft(&self, field: CalcField) -> Option<&DraftInput> {
        match field {
            CalcField::Length => Some(&self.concrete.length),
            CalcField::Width => Some(&self.concrete.width),
            CalcField::Thickness => Some(&self.concrete.thickness),
            CalcField::Waste => Some(&self.concrete.waste),
            CalcField::Area => Some(&self.paint.area),
            CalcField::Coverage => Some(&self.paint.coverage),
            CalcField::Coats => None,
        }
    }

    fn draft_mut(&mut self, field: CalcField) -> Option<&mut DraftInput> {
        match field {
            CalcField::Length => Some(&mut self.concrete.length),
            CalcField::Width => Some(&mut self.concrete.width),
            CalcField::Thickness => Some(&mut self.concrete.thickness),
            CalcField::Waste => Some(&mut self.concrete.waste),
            CalcField::Area => Some(&mut self.paint.area),
            CalcField::Coverage => Some(&mut self.paint.coverage),
            CalcField::Coats => None,
        }
    }

    pub(super) fn focused_draft_mut(&mut self) -> Option<&mut DraftInput> {
        self.draft_mut(self.focused_field())
    }

    /// Type into the focused field.
    ///
    /// Text fields accept digits, `.` and `-`. On the coats selector `1` and
    /// `2` pick a value and space toggles it.
    pub fn insert_char(&mut self, c: char) {
        if self.focused_field().is_selector() {
            match c {
                '1' => self.paint.coats = Coats::One,
                '2' => self.paint.coats = Coats::Two,
                ' ' => self.toggle_coats(),
                _ => {}
            }
            return;
        }
        if is_numeric_char(c)
            && let Some(draft) = self.focused_draft_mut()
        {
            draft.insert_char(c);
        }
    }

    pub fn toggle_coats(&mut self) {
        self.paint.coats = self.paint.coats.toggled();
    }
}
