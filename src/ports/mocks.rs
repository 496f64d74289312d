//! Mock implementations for testing

use crate::error::{AppError, Result};
use crate::ports::documents::DocumentSinkPort;
use crate::ports::llm::SummarizerPort;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Mock summarizer returning a canned reply and recording every call
#[derive(Clone, Default)]
pub struct MockSummarizer {
    reply: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockSummarizer {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummarizerPort for MockSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(self.reply.clone())
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Mock summarizer that always fails
#[derive(Clone, Default)]
pub struct FailingSummarizer;

#[async_trait]
impl SummarizerPort for FailingSummarizer {
    async fn summarize(&self, _text: &str) -> Result<String> {
        Err(AppError::Llm("mock summarizer failure".to_string()))
    }

    fn provider_name(&self) -> &str {
        "mock-failing"
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Mock document sink capturing submitted payloads
#[derive(Clone, Default)]
pub struct MockDocumentSink {
    submitted: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl MockDocumentSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<serde_json::Value> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentSinkPort for MockDocumentSink {
    async fn submit(&self, payload: &serde_json::Value) -> Result<String> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(payload.clone());
        Ok(format!("page-{}", submitted.len()))
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_sink_records_payloads() {
        let sink = MockDocumentSink::new();
        let id = sink.submit(&json!({"parent": {"database_id": "db"}})).await.unwrap();

        assert_eq!(id, "page-1");
        assert_eq!(sink.submitted().len(), 1);
    }
}
