//! Domain logic for TlapalIA.
//!
//! The calculators are pure functions of the current form fields. The UI
//! re-evaluates them on every frame, so nothing here caches or stores state.

pub mod calc;

pub use calc::{
    CONTAINER_LITERS, ConcreteEstimate, ConcreteInputs, PaintEstimate, PaintInputs, concrete,
    format_liters, format_m3, paint, parse_field,
};
