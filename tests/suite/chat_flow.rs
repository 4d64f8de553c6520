//! End-to-end chat: config -> App -> remote endpoint -> transcript -> screen.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tlapal_engine::{App, NO_ANSWER_TEXT, Role, SYSTEM_INSTRUCTION, TECHNICAL_ERROR_TEXT, Tab};

use crate::common::{
    MODEL_PATH, answer_body, app_for, mount_answer, mount_failures, render, type_text,
    wait_for_replies,
};

fn save_key(app: &mut App, key: &str) {
    app.set_tab(Tab::Settings);
    app.enter_insert_mode();
    app.insert_text(key);
    app.submit();
    app.set_tab(Tab::Chat);
}

fn send(app: &mut App, text: &str) {
    app.enter_insert_mode();
    type_text(app, text);
    app.submit();
}

#[tokio::test]
async fn answer_reaches_transcript_and_screen() {
    let server = MockServer::start().await;
    mount_answer(&server, "Para 20 m² use 4 litros.").await;

    let mut app = app_for(&server, "");
    save_key(&mut app, "AIza-prueba");
    send(&mut app, "¿Cuánta pintura?");
    wait_for_replies(&mut app).await;

    let last = app.chat().transcript().last().unwrap();
    assert_eq!(last.role(), Role::Assistant);
    assert_eq!(last.text(), "Para 20 m² use 4 litros.");

    let screen = render(&app, 100, 30);
    assert!(screen.contains("¿Cuánta pintura?"));
    assert!(screen.contains("Para 20 m² use 4 litros."));
    assert!(!screen.contains("AIza-prueba"));
}

#[tokio::test]
async fn request_carries_query_instruction_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(query_param("key", "AIza-prueba"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server, "");
    save_key(&mut app, "AIza-prueba");
    send(&mut app, "¿Qué cemento uso?");
    wait_for_replies(&mut app).await;

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "contents": [{ "parts": [{ "text": "¿Qué cemento uso?" }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] }
        })
    );
}

#[tokio::test]
async fn five_server_errors_then_answer_takes_six_requests() {
    let server = MockServer::start().await;
    mount_failures(&server, 500, 5).await;
    mount_answer(&server, "Al sexto intento.").await;

    let mut app = app_for(&server, "");
    send(&mut app, "hola");
    wait_for_replies(&mut app).await;

    assert_eq!(
        app.chat().transcript().last().unwrap().text(),
        "Al sexto intento."
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 6);
}

#[tokio::test]
async fn exhausted_retries_show_generic_error_only() {
    let server = MockServer::start().await;
    mount_failures(&server, 503, 100).await;

    let mut app = app_for(&server, "");
    send(&mut app, "hola");
    wait_for_replies(&mut app).await;

    assert_eq!(
        app.chat().transcript().last().unwrap().text(),
        TECHNICAL_ERROR_TEXT
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 6);

    let screen = render(&app, 100, 30);
    assert!(screen.contains(TECHNICAL_ERROR_TEXT));
    assert!(!screen.contains("backend failure"));
    assert!(!screen.contains("503"));
}

#[tokio::test]
async fn answer_without_text_shows_sentinel_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server, "");
    send(&mut app, "hola");
    wait_for_replies(&mut app).await;

    assert_eq!(
        app.chat().transcript().last().unwrap().text(),
        NO_ANSWER_TEXT
    );
}

#[tokio::test]
async fn whitespace_draft_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_body("no")))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = app_for(&server, "");
    send(&mut app, "  \t ");
    app.insert_char('\n');
    app.submit();
    app.tick();

    assert_eq!(app.pending_replies(), 0);
    assert_eq!(app.chat().transcript().len(), 1);
    assert!(!render(&app, 100, 30).contains("Escribiendo..."));
}
