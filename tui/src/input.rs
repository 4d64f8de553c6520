//! Input handling for the TlapalIA TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

use tlapal_engine::{App, CalculatorMode, InputMode, Tab};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close first so a thread blocked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if the caller exits early; never block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Backpressure instead of dropping events; a long paste must
                    // arrive whole.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Apply queued terminal events to the app. Returns `true` once the app should
/// exit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

fn apply_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            if matches!(key.kind, KeyEventKind::Release) {
                return app.should_quit();
            }

            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                app.request_quit();
                return true;
            }

            match app.input_mode() {
                InputMode::Normal => handle_normal_mode(app, key),
                InputMode::Insert => handle_insert_mode(app, key),
            }
        }
        Event::Paste(text) => {
            if app.input_mode() == InputMode::Insert {
                app.insert_text(&normalize_line_endings(&text));
            }
        }
        _ => {}
    }
    app.should_quit()
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    if app.tab() == Tab::Calculators && handle_calculator_keys(app, key, InputMode::Normal) {
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.request_quit();
        }
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(tab) = Tab::from_digit(c) {
                app.set_tab(tab);
            }
        }
        KeyCode::Tab => {
            app.next_tab();
        }
        KeyCode::BackTab => {
            app.prev_tab();
        }
        KeyCode::Char('i') | KeyCode::Enter => {
            app.enter_insert_mode();
        }
        _ => {}
    }
}

/// Form navigation shared by both modes. Returns whether the key was used.
fn handle_calculator_keys(app: &mut App, key: KeyEvent, mode: InputMode) -> bool {
    let calculators = app.calculators_mut();
    let on_selector = calculators.focused_field().is_selector();

    match (mode, key.code) {
        (InputMode::Normal, KeyCode::Char('c')) => calculators.set_mode(CalculatorMode::Concrete),
        (InputMode::Normal, KeyCode::Char('p')) => calculators.set_mode(CalculatorMode::Paint),
        (InputMode::Normal, KeyCode::Char('k')) | (_, KeyCode::Up) => calculators.focus_prev(),
        (InputMode::Normal, KeyCode::Char('j')) | (_, KeyCode::Down) => calculators.focus_next(),
        (InputMode::Insert, KeyCode::BackTab) => calculators.focus_prev(),
        (InputMode::Insert, KeyCode::Tab) => calculators.focus_next(),
        (_, KeyCode::Left | KeyCode::Right) if on_selector => calculators.toggle_coats(),
        (InputMode::Normal, KeyCode::Char(' ')) if on_selector => calculators.toggle_coats(),
        _ => return false,
    }
    true
}

fn is_newline_key(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Enter => key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SHIFT | KeyModifiers::ALT),
        KeyCode::Char('j') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn handle_insert_mode(app: &mut App, key: KeyEvent) {
    if app.tab() == Tab::Chat && is_newline_key(key) {
        app.insert_char('\n');
        return;
    }
    if app.tab() == Tab::Calculators && handle_calculator_keys(app, key, InputMode::Insert) {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            app.enter_normal_mode();
        }
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::Backspace => {
            app.backspace();
        }
        KeyCode::Delete => {
            app.delete_forward();
        }
        KeyCode::Left => {
            app.cursor_left();
        }
        KeyCode::Right => {
            app.cursor_right();
        }
        KeyCode::Home => {
            app.cursor_home();
        }
        KeyCode::End => {
            app.cursor_end();
        }
        KeyCode::Char('u') if ctrl => {
            app.clear_field();
        }
        KeyCode::Char('w') if ctrl => {
            app.delete_word_backwards();
        }
        KeyCode::Char('v') if ctrl => {
            paste_from_clipboard(app);
        }
        // \r only arrives through Enter or an unnormalized paste.
        KeyCode::Char(c) if !ctrl && c != '\r' => {
            app.insert_char(c);
        }
        _ => {}
    }
}

fn paste_from_clipboard(app: &mut App) {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
        Ok(text) => app.insert_text(&normalize_line_endings(&text)),
        Err(e) => tracing::debug!("Clipboard unavailable: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use tlapal_engine::{
        App, CalcField, CalculatorMode, Coats, Credential, GeminiClient, GeminiOptions, InputMode,
        Tab, UiOptions,
    };

    use super::apply_event;

    fn app() -> App {
        let client = GeminiClient::new(GeminiOptions {
            base_url: "http://127.0.0.1:9/v1beta".to_string(),
            ..GeminiOptions::default()
        })
        .unwrap();
        App::with_client(client, Credential::empty(), UiOptions::default())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        apply_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
        apply_event(app, Event::Key(KeyEvent::new(code, modifiers)))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn q_quits_only_in_normal_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.chat().draft().text(), "q");

        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn ctrl_c_quits_from_insert_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode(), InputMode::Insert);
        assert!(press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        apply_event(&mut app, Event::Key(key));
        assert_eq!(app.tab(), Tab::Chat);
    }

    #[test]
    fn number_and_tab_keys_switch_panels() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.tab(), Tab::Settings);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab(), Tab::Chat);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.tab(), Tab::Settings);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.tab(), Tab::Calculators);
    }

    #[test]
    fn modified_enter_inserts_newline_in_chat() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "uno");
        press_with(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        type_str(&mut app, "dos");
        press_with(&mut app, KeyCode::Char('j'), KeyModifiers::CONTROL);

        assert_eq!(app.chat().draft().text(), "uno\ndos\n");
        assert_eq!(app.chat().transcript().len(), 1);
    }

    #[test]
    fn paste_only_lands_in_insert_mode() {
        let mut app = app();
        apply_event(&mut app, Event::Paste("ignorado".to_string()));
        assert_eq!(app.chat().draft().text(), "");

        press(&mut app, KeyCode::Char('i'));
        apply_event(&mut app, Event::Paste("a\r\nb\rc".to_string()));
        assert_eq!(app.chat().draft().text(), "a\nb\nc");
    }

    #[test]
    fn ctrl_u_and_ctrl_w_edit_the_draft() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "pintura vinilica");
        press_with(&mut app, KeyCode::Char('w'), KeyModifiers::CONTROL);
        assert_eq!(app.chat().draft().text(), "pintura ");
        press_with(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(app.chat().draft().text(), "");
    }

    #[test]
    fn calculator_keys_in_normal_mode() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.calculators().mode(), CalculatorMode::Paint);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.calculators().focused_field(), CalcField::Coats);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.calculators().paint().coats, Coats::One);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.calculators().paint().coats, Coats::Two);

        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.calculators().focused_field(), CalcField::Area);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.calculators().mode(), CalculatorMode::Concrete);
    }

    #[test]
    fn calculator_insert_mode_filters_and_moves() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "4a.5");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "3");
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.calculators().concrete().length.text(), "4.");
        assert_eq!(app.calculators().concrete().width.text(), "3");
        assert_eq!(app.calculators().focused_field(), CalcField::Length);
    }

    #[test]
    fn settings_enter_saves_and_escape_discards() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "AIza-1");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(app.session().credential().expose_secret(), "AIza-1");

        press(&mut app, KeyCode::Char('i'));
        type_str(&mut app, "-extra");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session().credential().expose_secret(), "AIza-1");
    }
}
