/// Domain layer - core business models
///
/// These models are service-agnostic and represent the normalized transcript
/// plus the passes that run over it.
pub mod actions;
pub mod models;
pub mod prompts;

pub use actions::extract_action_items;
pub use models::{TranscriptSegment, TranscriptionResult};
pub use prompts::action_items_prompt;
