//! Core engine for TlapalIA - state machine and orchestration.
//!
//! This crate contains the `App` state machine without TUI dependencies. The
//! renderer reads it through accessors and the input layer drives it through
//! the `App` methods.

mod app;
pub mod ui;

pub use app::{
    App, CalcField, CalculatorMode, CalculatorState, ChatState, Coats, ConcreteForm, PaintForm,
    Session, SettingsNotice, SettingsState,
};
pub use ui::{DraftInput, InputMode, Tab, UiOptions};

pub use tlapal_config::TlapalConfig;
pub use tlapal_core::{ConcreteEstimate, PaintEstimate, format_liters, format_m3};
pub use tlapal_providers::{self, GeminiClient, GeminiOptions, NO_ANSWER_TEXT, SendError};
pub use tlapal_types::{Credential, Message, Role, Transcript};

/// Behavioral preamble sent with every chat request.
pub const SYSTEM_INSTRUCTION: &str = "Eres 'TlapalIA', el asistente experto de la 'Tlapalería Los Pinos'. Tu tono es amable y profesional. Responde únicamente en TEXTO PLANO sin Markdown. No uses asteriscos. Usa saltos de línea para separar ideas.";

/// First assistant message of every session.
pub const WELCOME_TEXT: &str = "¡Hola! Bienvenido a Tlapalería Los Pinos. Soy TlapalIA.

CONFIGURACION NECESARIA
Para que pueda responderte, necesitamos configurar tu llave de acceso (API Key) gratuita:

1. Consigue tu clave gratis en: aistudio.google.com
2. Ve al menu de Ajustes aqui en la app.
3. Pega tu clave en el cuadro de texto.

¡Cuando termines, vuelve aqui y platicamos de tu obra!";

/// Shown in place of an answer when the remote call fails.
pub const TECHNICAL_ERROR_TEXT: &str = "Hubo un error tecnico. Intenta de nuevo.";

/// Indicator shown while at least one reply is pending.
pub const TYPING_TEXT: &str = "Escribiendo...";

pub const VERSION_LABEL: &str = concat!("TlapalIA Los Pinos v", env!("CARGO_PKG_VERSION"));
