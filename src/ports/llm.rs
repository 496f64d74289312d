/// Summarizer port trait
///
/// Defines the interface for the LLM summarizer used as a hint source when
/// extracting action items. Implementation: OpenAI
use crate::error::Result;
use async_trait::async_trait;

/// Port trait for text-to-text summarization services
#[async_trait]
pub trait SummarizerPort: Send + Sync {
    /// Summarize a transcript into candidate action-item lines
    async fn summarize(&self, text: &str) -> Result<String>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is configured (has API key)
    fn is_configured(&self) -> bool;
}

/// Identity summarizer used when no LLM is configured; the extraction pass
/// then works directly off the transcript lines.
#[derive(Debug, Clone, Default)]
pub struct PassthroughSummarizer;

#[async_trait]
impl SummarizerPort for PassthroughSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    fn provider_name(&self) -> &str {
        "passthrough"
    }

    fn is_configured(&self) -> bool {
        true
    }
}
