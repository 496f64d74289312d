//! Voice Scribe - file-based meeting transcription pipeline
//!
//! Takes a recorded audio file, transcribes it with Deepgram (single request
//! or streaming session), extracts action items with an LLM summarizer, and
//! assembles a Notion page payload from the transcript.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

pub use config::Settings;
pub use domain::models::{TranscriptSegment, TranscriptionResult};
pub use error::{AppError, Result};
