/// Adapters - implementations of the port traits for external services
pub mod deepgram;
pub mod notion;
pub mod openai;

pub use deepgram::{DeepgramClient, DeepgramConfig, LiveTranscription};
pub use notion::{build_page_payload, NotionClient};
pub use openai::OpenAISummarizer;
