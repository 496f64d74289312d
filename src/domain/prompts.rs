//! Prompt template for action-item summarization

/// Default prompt for action item extraction.
///
/// The summarizer output is post-processed by `domain::actions`, which strips
/// leading bullet and numbering markers line by line.
pub fn action_items_prompt() -> &'static str {
    r#"You are an expert at extracting action items from meetings. Analyze the following meeting transcript and identify all actionable tasks.

Meeting Transcript:
{transcript}

Extract all action items, decisions requiring follow-up, and tasks mentioned. Format each action item on a separate line starting with "- ". Be specific and actionable."#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_has_transcript_placeholder() {
        assert!(action_items_prompt().contains("{transcript}"));
    }
}
