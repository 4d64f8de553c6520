//! Building an `App` from the config file.

use std::time::Duration;

use tlapal_config::{RetrySettings, TlapalConfig};
use tlapal_providers::{
    DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, GEMINI_API_BASE_URL, GeminiClient, GeminiOptions,
    RetryConfig, SendError,
};
use tlapal_types::Credential;

use super::App;

impl App {
    /// Build the app from an optional config.
    ///
    /// The session always starts without a credential. Fails only when the
    /// HTTP client cannot be built.
    pub fn new(config: Option<&TlapalConfig>) -> Result<Self, SendError> {
        let options = gemini_options(config);
        tracing::info!(
            model = %options.model,
            base_url = %options.base_url,
            timeout_secs = options.timeout.as_secs(),
            max_retries = options.retry.max_retries,
            "Configured Gemini client"
        );
        let client = GeminiClient::new(options)?;

        let ui_options = config.map(TlapalConfig::ui_options).unwrap_or_default();
        Ok(Self::with_client(client, Credential::empty(), ui_options))
    }
}

pub(crate) fn gemini_options(config: Option<&TlapalConfig>) -> GeminiOptions {
    let google = config.and_then(|c| c.google.as_ref());
    let non_blank = |value: Option<&String>| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    GeminiOptions {
        base_url: non_blank(google.and_then(|g| g.base_url.as_ref()))
            .unwrap_or_else(|| GEMINI_API_BASE_URL.to_string()),
        model: non_blank(google.and_then(|g| g.model.as_ref()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        timeout: Duration::from_secs(
            google
                .and_then(|g| g.timeout_seconds)
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        ),
        retry: retry_config(config.and_then(|c| c.retry.as_ref())),
    }
}

fn retry_config(settings: Option<&RetrySettings>) -> RetryConfig {
    let defaults = RetryConfig::default();
    let Some(settings) = settings else {
        return defaults;
    };

    RetryConfig {
        max_retries: settings.max_retries.unwrap_or(defaults.max_retries),
        initial_delay: settings
            .initial_delay_ms
            .map_or(defaults.initial_delay, Duration::from_millis),
        max_delay: settings
            .max_delay_ms
            .map_or(defaults.max_delay, Duration::from_millis),
        jitter_factor: settings
            .jitter_factor
            .filter(|f| f.is_finite())
            .map_or(defaults.jitter_factor, |f| f.clamp(0.0, 1.0)),
    }
}
