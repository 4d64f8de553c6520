//! Remote-call component for TlapalIA.
//!
//! - [`gemini`] - Google Gemini client (GenerateContent API, non-streaming)
//! - [`retry`] - exponential backoff around a single request/response exchange
//!
//! One call to [`GeminiClient::send`] sends one user query with a fixed system
//! instruction and resolves to the answer text. Transport failures and error
//! statuses are retried; a successful response that carries no usable text
//! resolves to [`NO_ANSWER_TEXT`] instead of an error.

pub mod gemini;
pub mod retry;

use std::time::Duration;

pub use gemini::{
    AttemptFailure, DEFAULT_MODEL, GeminiClient, GeminiOptions, NO_ANSWER_TEXT, SendError,
};
pub use retry::RetryConfig;

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-attempt timeout used when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const CONNECT_TIMEOUT_SECS: u64 = 30;

// reqwest only exposes tcp_keepalive (idle time); interval/retries use platform defaults.
const TCP_KEEPALIVE_SECS: u64 = 60;

const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(concat!("tlapalia/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

/// HTTP client whose `timeout` bounds each attempt, connect to last body byte.
pub fn http_client_with_timeout(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    base_client_builder().timeout(timeout).build()
}

/// Read an error response body, keeping at most 32 KiB of it.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
