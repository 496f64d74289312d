/// Transcription service port trait
///
/// Defines the interface for ASR (Automatic Speech Recognition) services.
/// Implementation: Deepgram (REST batch + WebSocket streaming)
use crate::domain::models::TranscriptionResult;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-request transcription parameters, sent as query parameters.
///
/// Kept as an ordered string map so request URLs are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscribeOptions {
    params: BTreeMap<String, String>,
}

impl TranscribeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary query parameter
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn model(self, model: &str) -> Self {
        self.set("model", model)
    }

    pub fn language(self, language: &str) -> Self {
        self.set("language", language)
    }

    pub fn punctuate(self, enabled: bool) -> Self {
        self.set("punctuate", if enabled { "true" } else { "false" })
    }

    pub fn diarize(self, enabled: bool) -> Self {
        self.set("diarize", if enabled { "true" } else { "false" })
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Borrowed key/value pairs for reqwest's query serializer
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    /// Render the options as a query string for WebSocket URLs
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Port trait for transcription services (ASR)
#[async_trait]
pub trait TranscriptionServicePort: Send + Sync {
    /// Transcribe a complete audio buffer in one blocking request
    async fn transcribe_file(
        &self,
        audio: &[u8],
        mimetype: &str,
        options: &TranscribeOptions,
    ) -> Result<TranscriptionResult>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is configured (has API key)
    fn is_configured(&self) -> bool;

    /// Check if the service can open streaming sessions
    fn supports_streaming(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_is_key_sorted() {
        let options = TranscribeOptions::new()
            .punctuate(true)
            .model("nova-2-meeting")
            .diarize(false);

        assert_eq!(
            options.to_query_string(),
            "diarize=false&model=nova-2-meeting&punctuate=true"
        );
    }

    #[test]
    fn test_empty_options() {
        let options = TranscribeOptions::new();
        assert!(options.is_empty());
        assert_eq!(options.to_query_string(), "");
    }
}
