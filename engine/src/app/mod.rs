//! The `App` state machine.
//!
//! `App` owns every piece of mutable state: the active panel, the input mode,
//! the chat transcript, the calculator forms and the session credential. The
//! UI task is the only one touching it. Chat requests run on spawned tasks and
//! report back through an unbounded channel drained by [`App::process_replies`].

mod calculators;
mod chat;
mod init;
mod settings;


use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use tlapal_providers::{GeminiClient, SendError};
use tlapal_types::{Credential, ui::UiOptions};

pub use calculators::{CalcField, CalculatorMode, CalculatorState, Coats, ConcreteForm, PaintForm};
pub use chat::ChatState;
pub use settings::{Session, SettingsNotice, SettingsState};

use crate::ui::{DraftInput, InputMode, Tab};

/// Spinner cadence, independent of render FPS.
const UI_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Result of one spawned chat request.
#[derive(Debug)]
pub(crate) struct ChatReply {
    result: Result<String, SendError>,
}

struct AppUi {
    tab: Tab,
    mode: InputMode,
    should_quit: bool,
    options: UiOptions,
    /// Wall-clock timestamp for animation tick cadence (spinner ~10Hz).
    last_ui_tick: Instant,
    tick: usize,
}

struct AppRuntime {
    client: GeminiClient,
    reply_tx: mpsc::UnboundedSender<ChatReply>,
    reply_rx: mpsc::UnboundedReceiver<ChatReply>,
}

pub struct App {
    ui: AppUi,
    chat: ChatState,
    calculators: CalculatorState,
    settings: SettingsState,
    session: Session,
    runtime: AppRuntime,
}

impl App {
    /// Build an app around an existing client.
    #[must_use]
    pub fn with_client(client: GeminiClient, credential: Credential, options: UiOptions) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            ui: AppUi {
                tab: Tab::default(),
                mode: InputMode::default(),
                should_quit: false,
                options,
                last_ui_tick: Instant::now(),
                tick: 0,
            },
            chat: ChatState::new(),
            calculators: CalculatorState::default(),
            settings: SettingsState::default(),
            session: Session::new(credential),
            runtime: AppRuntime {
                client,
                reply_tx,
                reply_rx,
            },
        }
    }

    pub fn should_quit(&self) -> bool {
        self.ui.should_quit
    }

    pub fn request_quit(&mut self) {
        self.ui.should_quit = true;
    }

    pub fn ui_options(&self) -> UiOptions {
        self.ui.options
    }

    pub fn tick_count(&self) -> usize {
        self.ui.tick
    }

    pub fn tick(&mut self) {
        self.process_replies();

        let now = Instant::now();
        if now.duration_since(self.ui.last_ui_tick) >= UI_TICK_INTERVAL {
            self.ui.last_ui_tick = now;
            self.ui.tick = self.ui.tick.wrapping_add(1);
        }
    }

    // ------------------------------------------------------------------
    // Panels and modes
    // ------------------------------------------------------------------

    pub fn tab(&self) -> Tab {
        self.ui.tab
    }

    /// Switch panels. Pending edits in insert mode are left as they are, and
    /// the new panel starts in normal mode.
    pub fn set_tab(&mut self, tab: Tab) {
        if self.ui.tab == tab {
            return;
        }
        self.enter_normal_mode();
        self.ui.tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.set_tab(self.ui.tab.next());
    }

    pub fn prev_tab(&mut self) {
        self.set_tab(self.ui.tab.prev());
    }

    pub fn input_mode(&self) -> InputMode {
        self.ui.mode
    }

    pub fn enter_insert_mode(&mut self) {
        if self.ui.mode == InputMode::Insert {
            return;
        }
        if self.ui.tab == Tab::Settings {
            self.settings.begin_edit(self.session.credential());
        }
        self.ui.mode = InputMode::Insert;
    }

    pub fn enter_normal_mode(&mut self) {
        if self.ui.mode == InputMode::Normal {
            return;
        }
        if self.ui.tab == Tab::Settings {
            self.settings.cancel_edit();
        }
        self.ui.mode = InputMode::Normal;
    }

    /// `Enter` in insert mode: send, save or move on, depending on the panel.
    pub fn submit(&mut self) {
        match self.ui.tab {
            Tab::Chat => {
                self.submit_chat();
            }
            Tab::Calculators => self.calculators.focus_next(),
            Tab::Settings => {
                self.save_credential();
                self.ui.mode = InputMode::Normal;
            }
        }
    }

    // ------------------------------------------------------------------
    // Editing the focused field
    // ------------------------------------------------------------------

    fn focused_draft_mut(&mut self) -> Option<&mut DraftInput> {
        match self.ui.tab {
            Tab::Chat => Some(self.chat.draft_mut()),
            Tab::Calculators => self.calculators.focused_draft_mut(),
            Tab::Settings => Some(self.settings.draft_mut()),
        }
    }

    /// Type one character into the focused field.
    pub fn insert_char(&mut self, c: char) {
        if self.ui.tab == Tab::Calculators {
            self.calculators.insert_char(c);
        } else if let Some(draft) = self.focused_draft_mut() {
            draft.insert_char(c);
        }
    }

    /// Paste text into the focused field.
    ///
    /// The credential field keeps a single line; calculator fields keep only
    /// numeric characters.
    pub fn insert_text(&mut self, text: &str) {
        match self.ui.tab {
            Tab::Chat => self.chat.draft_mut().insert_str(&text.replace("\r\n", "\n")),
            Tab::Calculators => text.chars().for_each(|c| self.calculators.insert_char(c)),
            Tab::Settings => {
                let line: String = text.chars().filter(|c| !c.is_control()).collect();
                self.settings.draft_mut().insert_str(&line);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(draft) = self.focused_draft_mut() {
            draft.backspace();
        }
    }

    pub fn delete_forward(&mut self) {
        if let Some(draft) = self.focused_draft_mut() {
            draft.delete();
        }
    }

    pub fn delete_word_backwards(&mut self) {
        if let Some(draft) = self.focused_draft_mut() {
            draft.delete_word_backwards();
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(draft) = self.focused_draft_mut() {
            draft.clear();
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(draft) = self.focused_draft_mut() {
            draft.move_left();
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(draft) = self.focused_draft_mut() {
            draft.move_right();
        }
    }

    pub fn cursor_home(&mut self) {
        if let Some(draft) = self.focused_draft_mut() {
            draft.move_home();
        }
    }

    pub fn cursor_end(&mut self) {
        if let Some(draft) = self.focused_draft_mut() {
            draft.move_end();
        }
    }

    // ------------------------------------------------------------------
    // Panel state accessors
    // ------------------------------------------------------------------

    pub fn chat(&self) -> &ChatState {
        &self.chat
    }

    pub fn calculators(&self) -> &CalculatorState {
        &self.calculators
    }

    pub fn calculators_mut(&mut self) -> &mut CalculatorState {
        &mut self.calculators
    }

    pub fn settings(&self) -> &SettingsState {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &GeminiClient {
        &self.runtime.client
    }
}
