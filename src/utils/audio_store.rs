//! Local audio file storage
//!
//! File-based audio ingestion instead of real-time microphone capture:
//! persists binary audio data under a storage directory and reads it back
//! for transcription.

use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata describing an audio file stored on disk
#[derive(Debug, Clone)]
pub struct StoredAudio {
    pub path: PathBuf,
    pub mime_type: Option<String>,
}

impl StoredAudio {
    /// Read all bytes from the stored audio file
    pub fn read(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

/// Stores and retrieves audio files from a local directory
pub struct FileAudioStore {
    storage_directory: PathBuf,
}

impl FileAudioStore {
    /// Create a store rooted at the given directory, creating it if needed
    pub fn new(storage_directory: &Path) -> Result<Self> {
        fs::create_dir_all(storage_directory)?;
        let storage_directory = storage_directory.canonicalize()?;
        Ok(Self { storage_directory })
    }

    pub fn storage_directory(&self) -> &Path {
        &self.storage_directory
    }

    /// Persist audio bytes under the storage directory.
    ///
    /// Refuses to replace an existing file unless `overwrite` is set.
    pub fn store(
        &self,
        data: &[u8],
        filename: &str,
        mime_type: Option<&str>,
        overwrite: bool,
    ) -> Result<StoredAudio> {
        let destination = self.storage_directory.join(filename);
        if destination.exists() && !overwrite {
            return Err(AppError::AudioStore(format!(
                "Audio file '{}' already exists. Pass overwrite to replace it.",
                destination.display()
            )));
        }

        fs::write(&destination, data)?;
        Ok(StoredAudio {
            path: destination,
            mime_type: mime_type.map(str::to_string),
        })
    }

    /// Copy an existing audio file into the storage directory
    pub fn add_existing_file(
        &self,
        file_path: &Path,
        mime_type: Option<&str>,
        overwrite: bool,
    ) -> Result<StoredAudio> {
        if !file_path.is_file() {
            return Err(AppError::AudioStore(format!(
                "Audio file '{}' does not exist.",
                file_path.display()
            )));
        }

        let file_name = file_path.file_name().ok_or_else(|| {
            AppError::AudioStore(format!(
                "Audio file '{}' has no file name.",
                file_path.display()
            ))
        })?;

        let destination = self.storage_directory.join(file_name);
        if destination.exists() && !overwrite {
            return Err(AppError::AudioStore(format!(
                "Audio file '{}' already exists. Pass overwrite to replace it.",
                destination.display()
            )));
        }

        if file_path.canonicalize()? != destination {
            fs::copy(file_path, &destination)?;
        }

        Ok(StoredAudio {
            path: destination,
            mime_type: mime_type.map(str::to_string),
        })
    }

    /// Metadata for all files inside the storage directory, sorted by path
    pub fn list_audio(&self) -> Result<Vec<StoredAudio>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.storage_directory)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| StoredAudio {
                path,
                mime_type: None,
            })
            .collect())
    }

    /// Read all bytes from a stored audio file, rejecting paths that escape
    /// the storage directory
    pub fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let resolved = self.resolve(path)?;
        Ok(fs::read(resolved)?)
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.storage_directory.join(path)
        };

        if !candidate.exists() {
            return Err(AppError::AudioStore(format!(
                "Audio file '{}' does not exist.",
                candidate.display()
            )));
        }

        let candidate = candidate.canonicalize()?;
        if !candidate.starts_with(&self.storage_directory) {
            return Err(AppError::AudioStore(format!(
                "Audio file '{}' is outside the storage directory {}.",
                candidate.display(),
                self.storage_directory.display()
            )));
        }

        Ok(candidate)
    }
}
