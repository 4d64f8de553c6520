//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::time::Duration;

use ratatui::{Terminal, backend::TestBackend};
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tlapal_engine::{App, TlapalConfig};

pub const TEST_MODEL: &str = "test-model";

pub const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

/// Body of a successful `generateContent` answer.
pub fn answer_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "text": text }]
            },
            "finishReason": "STOP"
        }]
    })
}

/// Mount a successful answer for every request
pub async fn mount_answer(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_body(text)))
        .mount(server)
        .await;
}

/// Mount `times` failures with `status` ahead of anything mounted later.
pub async fn mount_failures(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string("backend failure"))
        .up_to_n_times(times)
        .with_priority(1)
        .mount(server)
        .await;
}

/// Write a config file pointing at the mock server, with millisecond backoff.
pub fn config_file(server: &MockServer, extra: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[google]
model = "{TEST_MODEL}"
base_url = "{}/v1beta"
timeout_seconds = 5

[retry]
initial_delay_ms = 1
max_delay_ms = 4

{extra}
"#,
        server.uri()
    )
    .unwrap();
    file
}

/// Build an app from a config file pointing at the mock server.
pub fn app_for(server: &MockServer, extra: &str) -> App {
    let file = config_file(server, extra);
    let config = TlapalConfig::load_from(file.path()).unwrap();
    App::new(Some(&config)).unwrap()
}

pub fn type_text(app: &mut App, text: &str) {
    text.chars().for_each(|c| app.insert_char(c));
}

/// Poll the app until every spawned request has been answered.
pub async fn wait_for_replies(app: &mut App) {
    for _ in 0..500 {
        app.tick();
        if app.pending_replies() == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("replies did not arrive in time");
}

/// Render one frame and return the screen as text, one row per line.
pub fn render(app: &App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| tlapal_tui::draw(frame, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
