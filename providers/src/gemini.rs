//! Google Gemini client (GenerateContent API).
//!
//! A call is a single, non-streaming exchange:
//!
//! ```text
//! POST {base_url}/models/{model}:generateContent?key={credential}
//! {"contents":[{"parts":[{"text":"..."}]}],"systemInstruction":{"parts":[{"text":"..."}]}}
//! ```
//!
//! The answer is read from `candidates[0].content.parts[0].text`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use tlapal_types::Credential;

use crate::{
    DEFAULT_TIMEOUT_SECS, GEMINI_API_BASE_URL, http_client_with_timeout, read_capped_error_body,
    retry::{RetryConfig, RetryOutcome, send_with_retry},
};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Answer used when a successful response carries no usable text.
pub const NO_ANSWER_TEXT: &str = "No hay respuesta disponible.";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    system_instruction: RequestContent<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> RequestContent<'a> {
    fn text(text: &'a str) -> Self {
        Self {
            parts: vec![RequestPart { text }],
        }
    }
}

impl<'a> GenerateContentRequest<'a> {
    fn new(query: &'a str, system_instruction: &'a str) -> Self {
        Self {
            contents: vec![RequestContent::text(query)],
            system_instruction: RequestContent::text(system_instruction),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

/// Extract the answer from a successful response body.
///
/// Malformed JSON, a missing text path and empty text all yield
/// [`NO_ANSWER_TEXT`].
#[must_use]
pub fn answer_from_payload(payload: &[u8]) -> String {
    match serde_json::from_slice::<GenerateContentResponse>(payload) {
        Ok(response) => response.into_first_text().unwrap_or_else(|| {
            tracing::warn!("Gemini response has no text at candidates[0].content.parts[0]");
            NO_ANSWER_TEXT.to_string()
        }),
        Err(e) => {
            tracing::warn!("Gemini response is not valid JSON: {e}");
            NO_ANSWER_TEXT.to_string()
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why a single attempt failed. Every variant is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
}

impl AttemptFailure {
    /// The URL carries the credential, so it is stripped before formatting.
    fn transport(error: reqwest::Error) -> Self {
        let error = error.without_url();
        let mut message = error.to_string();
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Transport(message)
    }
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("invalid endpoint URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: AttemptFailure },
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeminiOptions {
    pub base_url: String,
    pub model: String,
    /// Bounds each attempt, not the whole retried call.
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for GeminiOptions {
    fn default() -> Self {
        Self {
            base_url: GEMINI_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }
}

/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    options: GeminiOptions,
}

impl GeminiClient {
    pub fn new(options: GeminiOptions) -> Result<Self, SendError> {
        let http = http_client_with_timeout(options.timeout)
            .map_err(|e| SendError::Client(e.without_url()))?;
        Ok(Self { http, options })
    }

    #[must_use]
    pub fn options(&self) -> &GeminiOptions {
        &self.options
    }

    /// `{base_url}/models/{model}:generateContent?key={credential}`.
    pub fn endpoint(&self, credential: &Credential) -> Result<Url, SendError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.options.base_url.trim_end_matches('/'),
            self.options.model
        );
        let invalid = |reason: String| SendError::InvalidUrl {
            url: raw.clone(),
            reason,
        };

        let mut url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
        }
        url.query_pairs_mut()
            .append_pair("key", credential.expose_secret());
        Ok(url)
    }

    /// Send one query and wait for the answer, retrying failed attempts.
    ///
    /// An empty credential is sent as-is; the endpoint rejects it and the
    /// rejection goes through the normal retry path.
    pub async fn send(
        &self,
        query: &str,
        system_instruction: &str,
        credential: &Credential,
    ) -> Result<String, SendError> {
        let url = self.endpoint(credential)?;
        let body = GenerateContentRequest::new(query, system_instruction);

        let outcome = send_with_retry(&self.options.retry, |attempt| {
            tracing::debug!(attempt, model = %self.options.model, "Sending Gemini request");
            let request = self.http.post(url.clone()).json(&body);
            async move { execute_attempt(request).await }
        })
        .await;

        match outcome {
            RetryOutcome::Success(answer) => Ok(answer),
            RetryOutcome::Exhausted { attempts, last } => {
                Err(SendError::Exhausted { attempts, last })
            }
        }
    }
}

async fn execute_attempt(request: reqwest::RequestBuilder) -> Result<String, AttemptFailure> {
    let response = request.send().await.map_err(AttemptFailure::transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = read_capped_error_body(response).await;
        return Err(AttemptFailure::Status {
            status: status.as_u16(),
            body,
        });
    }

    let payload = response.bytes().await.map_err(AttemptFailure::transport)?;
    Ok(answer_from_payload(&payload))
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

    /// Fast retry config for tests (no real delays).
    fn fast_retry_config() -> RetryConfig {
        RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
            jitter_factor: 0.0,
        }
    }

    fn client_for(base_url: String) -> GeminiClient {
        GeminiClient::new(GeminiOptions {
            base_url,
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
            retry: fast_retry_config(),
        })
        .unwrap()
    }

    fn test_client(server: &MockServer) -> GeminiClient {
        client_for(format!("{}/v1beta", server.uri()))
    }

    fn answer(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
        }))
    }

    #[tokio::test]
    async fn returns_answer_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(answer("Hola"))
            .expect(1)
            .mount(&server)
            .await;

        let text = test_client(&server)
            .send("hola", "sistema", &Credential::new("k"))
            .await
            .unwrap();
        assert_eq!(text, "Hola");
    }

    #[tokio::test]
    async fn sends_body_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", "secret-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "contents": [{ "parts": [{ "text": "¿Cuántos bultos?" }] }],
                "systemInstruction": { "parts": [{ "text": "Responde en texto plano." }] }
            })))
            .respond_with(answer("Tres"))
            .expect(1)
            .mount(&server)
            .await;

        let text = test_client(&server)
            .send(
                "¿Cuántos bultos?",
                "Responde en texto plano.",
                &Credential::new("secret-key"),
            )
            .await
            .unwrap();
        assert_eq!(text, "Tres");
    }

    #[tokio::test]
    async fn empty_credential_is_still_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", ""))
            .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
            .expect(6)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .send("hola", "sistema", &Credential::empty())
            .await
            .unwrap_err();

        match err {
            SendError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 6);
                assert_eq!(
                    last,
                    AttemptFailure::Status {
                        status: 400,
                        body: "API key not valid".to_string()
                    }
                );
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_text_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })))
            .expect(1) // no retry on a successful status
            .mount(&server)
            .await;

        let text = test_client(&server)
            .send("hola", "sistema", &Credential::new("k"))
            .await
            .unwrap();
        assert_eq!(text, NO_ANSWER_TEXT);
    }

    #[tokio::test]
    async fn retries_five_errors_then_succeeds() {
        let server = MockServer::start().await;
        let attempt = AtomicU32::new(0);

        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(move |_: &wiremock::Request| {
                let n = attempt.fetch_add(1, Ordering::SeqCst);
                if n < 5 {
                    ResponseTemplate::new(500)
                } else {
                    answer("Por fin")
                }
            })
            .expect(6)
            .mount(&server)
            .await;

        let text = test_client(&server)
            .send("hola", "sistema", &Credential::new("k"))
            .await
            .unwrap();
        assert_eq!(text, "Por fin");
    }

    #[tokio::test]
    async fn gives_up_after_six_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(6)
            .mount(&server)
            .await;

        let err = test_client(&server)
            .send("hola", "sistema", &Credential::new("k"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SendError::Exhausted {
                attempts: 6,
                last: AttemptFailure::Status { status: 503, .. }
            }
        ));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_failure() {
        // Grab a free port, then close it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GeminiClient::new(GeminiOptions {
            base_url: format!("http://{addr}/v1beta"),
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
            retry: RetryConfig {
                max_retries: 1,
                ..fast_retry_config()
            },
        })
        .unwrap();

        let err = client
            .send("hola", "sistema", &Credential::new("super-secret"))
            .await
            .unwrap_err();

        match err {
            SendError::Exhausted {
                attempts,
                last: AttemptFailure::Transport(message),
            } => {
                assert_eq!(attempts, 2);
                assert!(!message.contains("super-secret"), "{message}");
            }
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_base_url_makes_no_attempt() {
        let err = client_for("::nope::".to_string())
            .send("hola", "sistema", &Credential::new("k"))
            .await
            .unwrap_err();
        assert!(matches!(err, SendError::InvalidUrl { .. }));
    }
}
