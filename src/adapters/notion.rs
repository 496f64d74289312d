//! Notion document adapter
//!
//! Builds the page payload combining transcript, metadata, and action items,
//! and submits it to the Notion pages API.

use crate::domain::models::TranscriptionResult;
use crate::error::{AppError, Result};
use crate::ports::documents::DocumentSinkPort;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const NOTION_API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Notion rich_text content fields cap out at 2000 characters; stay a safety
/// margin below that.
const TEXT_CONTENT_LIMIT: usize = 1990;

/// Build a Notion page payload from a transcription result.
///
/// Children are ordered: "Action Items" heading with one bulleted item per
/// action (omitted when there are none), then a "Transcript" heading with a
/// single paragraph (omitted when the text is empty). Metadata, when present,
/// becomes a rich_text property holding its key-sorted JSON encoding. Long
/// text is cut to the first 1990 characters, not word-aware.
pub fn build_page_payload(
    database_id: &str,
    title: &str,
    transcript: &TranscriptionResult,
    actions: &[String],
) -> Value {
    let mut children = Vec::new();

    if !actions.is_empty() {
        children.push(heading_block("Action Items"));
        for action in actions {
            children.push(bulleted_item_block(action));
        }
    }

    if !transcript.text.is_empty() {
        children.push(heading_block("Transcript"));
        children.push(paragraph_block(truncate_chars(
            &transcript.text,
            TEXT_CONTENT_LIMIT,
        )));
    }

    let mut properties = json!({
        "Name": { "title": [text_object(title)] }
    });

    if !transcript.metadata.is_empty() {
        // serde_json's default map is ordered by key, so this encoding is
        // deterministic.
        let encoded = Value::Object(transcript.metadata.clone()).to_string();
        properties["Metadata"] = json!({
            "rich_text": [text_object(truncate_chars(&encoded, TEXT_CONTENT_LIMIT))]
        });
    }

    json!({
        "parent": { "database_id": database_id },
        "properties": properties,
        "children": children,
    })
}

fn text_object(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}

fn heading_block(label: &str) -> Value {
    json!({
        "object": "block",
        "type": "heading_2",
        "heading_2": { "rich_text": [text_object(label)] }
    })
}

fn bulleted_item_block(content: &str) -> Value {
    json!({
        "object": "block",
        "type": "bulleted_list_item",
        "bulleted_list_item": { "rich_text": [text_object(content)] }
    })
}

fn paragraph_block(content: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": [text_object(content)] }
    })
}

/// Cut to the first `limit` characters, respecting char boundaries
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Notion service implementation
#[derive(Debug)]
pub struct NotionClient {
    client: Client,
    token: String,
    api_base: String,
}

impl NotionClient {
    /// Create a new Notion client, failing fast on a missing token
    pub fn new(token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(AppError::Config(
                "Notion API key not provided. Set NOTION_API_KEY or pass it explicitly."
                    .to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.to_string(),
            api_base: NOTION_API_BASE.to_string(),
        })
    }
}

#[async_trait]
impl DocumentSinkPort for NotionClient {
    async fn submit(&self, payload: &Value) -> Result<String> {
        log::info!("Creating Notion page");

        let response = self
            .client
            .post(format!("{}/pages", self.api_base))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", NOTION_VERSION)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::Notion(format!("Notion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Notion(format!(
                "Notion API error ({}): {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Notion(format!("Failed to parse Notion response: {}", e)))?;

        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::Notion("Notion response missing page id".to_string()))
    }

    fn provider_name(&self) -> &str {
        "Notion"
    }

    fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }
}
