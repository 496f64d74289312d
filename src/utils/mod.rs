//! Utility modules

pub mod audio_store;

pub use audio_store::{FileAudioStore, StoredAudio};
