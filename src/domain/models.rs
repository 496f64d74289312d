/// Normalized transcription models
///
/// Both Deepgram response shapes (batch and streaming) are normalized into
/// these types once, at the adapter boundary. Instances are never mutated
/// after construction.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One recognized word-level unit with optional timing and speaker attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// The recognized text, punctuated form when available
    pub text: String,

    /// Start time in seconds
    pub start: Option<f64>,

    /// End time in seconds
    pub end: Option<f64>,

    /// Speaker label; Deepgram's numeric indices are carried as decimal strings
    pub speaker: Option<String>,
}

/// One normalized transcription outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Full transcript text, possibly empty
    pub text: String,

    /// Word-level segments in source order
    pub segments: Vec<TranscriptSegment>,

    /// Remaining alternative fields, excluding the transcript and word list.
    /// serde_json::Map keeps keys sorted, so encodings are deterministic.
    pub metadata: serde_json::Map<String, serde_json::Value>,

    /// The untouched source response, retained for diagnostics
    pub raw: serde_json::Value,
}

impl TranscriptionResult {
    /// Distinct non-empty speaker labels across all segments
    pub fn speakers(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|segment| segment.speaker.as_deref())
            .filter(|speaker| !speaker.is_empty())
            .collect()
    }
}
