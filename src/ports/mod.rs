/// Port trait definitions (interfaces)
///
/// These traits define the contracts for adapters to implement.
/// Following the ports-and-adapters (hexagonal) architecture pattern.
pub mod documents;
pub mod llm;
pub mod transcription;

#[cfg(test)]
pub mod mocks;

pub use documents::DocumentSinkPort;
pub use llm::{PassthroughSummarizer, SummarizerPort};
pub use transcription::{TranscribeOptions, TranscriptionServicePort};
