//! Config file -> running app.

use std::io::Write;

use tempfile::NamedTempFile;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tlapal_config::ConfigError;
use tlapal_engine::{App, Tab, TlapalConfig};

use crate::common::{answer_body, app_for, render, type_text, wait_for_replies};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn key_in_config_file_is_not_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(query_param("key", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let file = write_config(&format!(
        r#"
[google]
api_key = "AIza-desde-config"
model = "test-model"
base_url = "{}/v1beta"
"#,
        server.uri()
    ));
    let config = TlapalConfig::load_from(file.path()).unwrap();
    let mut app = App::new(Some(&config)).unwrap();

    assert!(app.session().credential().is_empty());
    assert!(render(&app, 100, 30).contains("Sin clave API"));

    app.enter_insert_mode();
    type_text(&mut app, "hola");
    assert!(app.submit_chat());
    wait_for_replies(&mut app).await;
    assert_eq!(app.chat().transcript().last().unwrap().text(), "ok");
}

#[tokio::test]
async fn app_options_reach_the_renderer() {
    let server = MockServer::start().await;
    let mut app = app_for(
        &server,
        r"
[app]
ascii_only = true
high_contrast = true
",
    );
    assert!(app.ui_options().ascii_only);
    assert!(app.ui_options().high_contrast);

    app.set_tab(Tab::Calculators);
    let screen = render(&app, 100, 30);
    assert!(screen.contains("0.00 m3"));
    assert!(!screen.contains("m³"));
}

#[test]
fn malformed_config_reports_its_path() {
    let file = write_config("[google\nmodel = ");
    let err = TlapalConfig::load_from(file.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), file.path());
}

#[test]
fn missing_sections_use_defaults() {
    let file = write_config("");
    let config = TlapalConfig::load_from(file.path()).unwrap();
    let app = App::new(Some(&config)).unwrap();

    assert!(!app.ui_options().ascii_only);
    assert_eq!(
        app.client().options().base_url,
        "https://generativelanguage.googleapis.com/v1beta"
    );
}
