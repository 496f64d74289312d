//! Deepgram transcription service adapter
//!
//! Batch transcription goes through the REST listen endpoint with the full
//! audio body in one request; streaming sessions go through the WebSocket
//! endpoint (see `streaming`). Both shapes of response are normalized by the
//! `response` module.

pub mod response;
pub mod streaming;

pub use streaming::LiveTranscription;

use crate::domain::models::TranscriptionResult;
use crate::error::{AppError, Result};
use crate::ports::transcription::{TranscribeOptions, TranscriptionServicePort};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const DEEPGRAM_REST_ENDPOINT: &str = "https://api.deepgram.com/v1/listen";
const DEEPGRAM_WEBSOCKET_ENDPOINT: &str = "wss://api.deepgram.com/v1/listen";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Deepgram connection configuration
///
/// Resolved explicitly by the caller (see `config::Settings`); the client
/// itself never consults the process environment. A `websocket_endpoint` of
/// `None` disables streaming support.
#[derive(Debug, Clone)]
pub struct DeepgramConfig {
    pub api_key: String,
    pub rest_endpoint: String,
    pub websocket_endpoint: Option<String>,
    pub timeout: Duration,
}

impl DeepgramConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            rest_endpoint: DEEPGRAM_REST_ENDPOINT.to_string(),
            websocket_endpoint: Some(DEEPGRAM_WEBSOCKET_ENDPOINT.to_string()),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Deepgram service implementation
#[derive(Debug)]
pub struct DeepgramClient {
    client: Client,
    config: DeepgramConfig,
}

impl DeepgramClient {
    /// Create a new Deepgram client.
    ///
    /// Fails fast with a configuration error when no API key is set; no
    /// network activity happens before that check.
    pub fn new(config: DeepgramConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::Config(
                "Deepgram API key not provided. Set DEEPGRAM_API_KEY or pass it explicitly."
                    .to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub(crate) fn config(&self) -> &DeepgramConfig {
        &self.config
    }

    pub(crate) fn authorization_header(&self) -> String {
        format!("Token {}", self.config.api_key)
    }
}

#[async_trait]
impl TranscriptionServicePort for DeepgramClient {
    async fn transcribe_file(
        &self,
        audio: &[u8],
        mimetype: &str,
        options: &TranscribeOptions,
    ) -> Result<TranscriptionResult> {
        log::info!(
            "Transcribing {} bytes with Deepgram (mimetype: {})",
            audio.len(),
            mimetype
        );

        let response = self
            .client
            .post(&self.config.rest_endpoint)
            .header("Authorization", self.authorization_header())
            .header("Content-Type", mimetype)
            .query(&options.query_pairs())
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| AppError::Transcription(format!("Deepgram request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Transcription(format!(
                "Deepgram API error ({}): {}",
                status, error_text
            )));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            AppError::Transcription(format!("Failed to parse Deepgram response: {}", e))
        })?;

        let result = response::normalize(payload);
        log::info!(
            "Deepgram transcription complete: {} segments, {} chars",
            result.segments.len(),
            result.text.len()
        );

        Ok(result)
    }

    fn provider_name(&self) -> &str {
        "Deepgram"
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn supports_streaming(&self) -> bool {
        self.config.websocket_endpoint.is_some()
    }
}
