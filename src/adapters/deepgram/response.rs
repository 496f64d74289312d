//! Deepgram response normalization
//!
//! The listen API answers in two envelope shapes: batch responses carry a
//! `results.channels` list, streaming messages carry a single `channel`
//! object. Both are resolved once into the tagged union below and normalized
//! into a `TranscriptionResult`. A response without alternatives normalizes
//! to an empty result rather than an error.

use crate::domain::models::{TranscriptSegment, TranscriptionResult};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListenResponse {
    Batch { results: BatchResults },
    Live { channel: Channel },
}

#[derive(Debug, Deserialize)]
struct BatchResults {
    #[serde(default)]
    channels: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    words: Option<Vec<Word>>,

    /// Everything else on the alternative becomes result metadata
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Word {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    punctuated_word: Option<String>,
    #[serde(default)]
    start: Option<f64>,
    #[serde(default)]
    end: Option<f64>,
    #[serde(default)]
    speaker: Option<SpeakerLabel>,
}

/// Deepgram reports speakers as numeric channel indices; other services use
/// string labels. Both are carried through as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpeakerLabel {
    Index(i64),
    Label(String),
}

impl SpeakerLabel {
    fn into_label(self) -> String {
        match self {
            SpeakerLabel::Index(index) => index.to_string(),
            SpeakerLabel::Label(label) => label,
        }
    }
}

/// Check whether a raw message carries usable transcript data.
///
/// Same shape detection as `normalize`, but without building segments; this
/// is the streaming receive loop's filter for control/metadata messages.
pub fn contains_transcript(payload: &Value) -> bool {
    if let Some(results) = payload.get("results") {
        return results
            .get("channels")
            .and_then(Value::as_array)
            .and_then(|channels| channels.first())
            .and_then(|channel| channel.get("alternatives"))
            .and_then(Value::as_array)
            .map(|alternatives| !alternatives.is_empty())
            .unwrap_or(false);
    }

    if let Some(channel) = payload.get("channel") {
        return channel
            .get("alternatives")
            .and_then(Value::as_array)
            .map(|alternatives| !alternatives.is_empty())
            .unwrap_or(false);
    }

    false
}

/// Normalize a decoded listen response of either shape.
///
/// Extracts the first channel's first alternative; the untouched payload is
/// retained as `raw` in every case.
pub fn normalize(raw: Value) -> TranscriptionResult {
    let alternative = serde_json::from_value::<ListenResponse>(raw.clone())
        .ok()
        .and_then(|response| {
            let channels = match response {
                ListenResponse::Batch { results } => results.channels,
                ListenResponse::Live { channel } => vec![channel],
            };
            channels
                .into_iter()
                .next()
                .and_then(|channel| channel.alternatives.into_iter().next())
        });

    let Some(alternative) = alternative else {
        return TranscriptionResult {
            text: String::new(),
            segments: Vec::new(),
            metadata: Map::new(),
            raw,
        };
    };

    let segments = alternative
        .words
        .unwrap_or_default()
        .into_iter()
        .map(|word| TranscriptSegment {
            text: word
                .punctuated_word
                .filter(|text| !text.is_empty())
                .or(word.word)
                .unwrap_or_default(),
            start: word.start,
            end: word.end,
            speaker: word.speaker.map(SpeakerLabel::into_label),
        })
        .collect();

    TranscriptionResult {
        text: alternative.transcript.unwrap_or_default(),
        segments,
        metadata: alternative.extra,
        raw,
    }
}
