//! Action-item extraction
//!
//! Derives an ordered list of short action strings from a normalized
//! transcript, using the summarizer as a hint source. Pure apart from the
//! single summarizer call; holds no state across invocations.

use crate::domain::models::TranscriptionResult;
use crate::error::Result;
use crate::ports::llm::SummarizerPort;

/// Extract action items from a transcription result.
///
/// An empty transcript short-circuits to an empty list without invoking the
/// summarizer. Otherwise the summarizer output (or, if it comes back empty,
/// the transcript itself) is split into lines, each stripped of leading
/// bullet/numbering markers. A non-empty transcript always yields at least
/// one action: if marker stripping eats every line, the whole candidate text
/// is emitted as a single action.
pub async fn extract_action_items(
    transcription: &TranscriptionResult,
    summarizer: &dyn SummarizerPort,
) -> Result<Vec<String>> {
    let transcript_text = transcription.text.trim();
    if transcript_text.is_empty() {
        return Ok(Vec::new());
    }

    let summary = summarizer.summarize(transcript_text).await?;
    let summary = summary.trim();
    let candidate = if summary.is_empty() {
        transcript_text
    } else {
        summary
    };

    let mut actions: Vec<String> = candidate
        .lines()
        .filter_map(|line| {
            let cleaned = strip_marker(line.trim());
            (!cleaned.is_empty()).then(|| cleaned.to_string())
        })
        .collect();

    if actions.is_empty() {
        actions.push(candidate.to_string());
    }

    Ok(actions)
}

/// Strip any leading run of bullet characters, digits, periods, and spaces
fn strip_marker(line: &str) -> &str {
    line.trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '.' | ' ') || c.is_ascii_digit())
        .trim()
}
