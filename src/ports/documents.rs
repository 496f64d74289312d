/// Document sink port trait
///
/// Defines the interface for the remote document database the assembled page
/// payload is submitted to. Implementation: Notion
use crate::error::Result;
use async_trait::async_trait;

/// Port trait for document submission services
#[async_trait]
pub trait DocumentSinkPort: Send + Sync {
    /// Submit a page payload, returning the identifier of the created document
    async fn submit(&self, payload: &serde_json::Value) -> Result<String>;

    /// Get the provider name
    fn provider_name(&self) -> &str;

    /// Check if the service is configured (has credentials)
    fn is_configured(&self) -> bool;
}
