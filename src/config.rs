//! Runtime configuration
//!
//! Settings are resolved once at startup from the process environment with an
//! optional .env overlay and passed explicitly into each component. Core
//! components never read the environment themselves.

use crate::error::{AppError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Environment variable holding the Deepgram API key
pub const DEEPGRAM_API_KEY_VAR: &str = "DEEPGRAM_API_KEY";
/// Environment variable holding the Notion integration token
pub const NOTION_API_KEY_VAR: &str = "NOTION_API_KEY";
/// Environment variable holding the target Notion database id
pub const NOTION_DATABASE_ID_VAR: &str = "NOTION_DATABASE_ID";
/// Environment variable holding the optional OpenAI API key
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable toggling debug logging
pub const DEBUG_VAR: &str = "DEBUG";

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub deepgram_api_key: String,
    pub notion_api_key: String,
    pub notion_database_id: String,
    /// When absent, action items are derived from the raw transcript
    pub openai_api_key: Option<String>,
    pub debug: bool,
}

impl Settings {
    /// Load settings from the process environment and an optional .env file.
    ///
    /// Entries from the .env file override inherited environment variables.
    /// When no path is given, `./.env` is used if it exists.
    pub fn from_env_file(env_file: Option<&Path>) -> Result<Self> {
        let mut env: HashMap<String, String> = std::env::vars().collect();

        let default_path = Path::new(".env");
        let path = match env_file {
            Some(path) => Some(path),
            None if default_path.exists() => Some(default_path),
            None => None,
        };

        if let Some(path) = path {
            let entries = dotenvy::from_path_iter(path)
                .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
            for entry in entries {
                let (key, value) = entry.map_err(|e| {
                    AppError::Config(format!("Failed to parse {}: {}", path.display(), e))
                })?;
                env.insert(key, value);
            }
        }

        Self::from_map(&env)
    }

    /// Resolve settings from an explicit key/value map.
    pub fn from_map(env: &HashMap<String, String>) -> Result<Self> {
        Ok(Self {
            deepgram_api_key: require(env, DEEPGRAM_API_KEY_VAR)?,
            notion_api_key: require(env, NOTION_API_KEY_VAR)?,
            notion_database_id: require(env, NOTION_DATABASE_ID_VAR)?,
            openai_api_key: optional(env, OPENAI_API_KEY_VAR),
            debug: optional_bool(env, DEBUG_VAR),
        })
    }
}

fn require(env: &HashMap<String, String>, key: &str) -> Result<String> {
    match env.get(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        Some(_) => Err(AppError::Config(format!(
            "Environment variable '{}' cannot be empty",
            key
        ))),
        None => Err(AppError::Config(format!(
            "Missing required environment variable: {}",
            key
        ))),
    }
}

fn optional(env: &HashMap<String, String>, key: &str) -> Option<String> {
    env.get(key)
        .filter(|value| !value.trim().is_empty())
        .cloned()
}

fn optional_bool(env: &HashMap<String, String>, key: &str) -> bool {
    env.get(key)
        .map(|raw| matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env() -> HashMap<String, String> {
        HashMap::from([
            (DEEPGRAM_API_KEY_VAR.to_string(), "dg-key".to_string()),
            (NOTION_API_KEY_VAR.to_string(), "notion-key".to_string()),
            (NOTION_DATABASE_ID_VAR.to_string(), "db-123".to_string()),
        ])
    }

    #[test]
    fn test_resolves_required_keys() {
        let settings = Settings::from_map(&full_env()).unwrap();
        assert_eq!(settings.deepgram_api_key, "dg-key");
        assert_eq!(settings.notion_api_key, "notion-key");
        assert_eq!(settings.notion_database_id, "db-123");
        assert_eq!(settings.openai_api_key, None);
        assert!(!settings.debug);
    }

    #[test]
    fn test_blank_optional_key_is_none() {
        let mut env = full_env();
        env.insert(OPENAI_API_KEY_VAR.to_string(), "  ".to_string());
        assert_eq!(Settings::from_map(&env).unwrap().openai_api_key, None);

        env.insert(OPENAI_API_KEY_VAR.to_string(), "oa-key".to_string());
        assert_eq!(
            Settings::from_map(&env).unwrap().openai_api_key,
            Some("oa-key".to_string())
        );
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let mut env = full_env();
        env.remove(NOTION_DATABASE_ID_VAR);
        let err = Settings::from_map(&env).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains(NOTION_DATABASE_ID_VAR));
    }

    #[test]
    fn test_empty_key_is_config_error() {
        let mut env = full_env();
        env.insert(DEEPGRAM_API_KEY_VAR.to_string(), "   ".to_string());
        let err = Settings::from_map(&env).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_debug_flag_parsing() {
        for raw in ["1", "true", "YES", "On"] {
            let mut env = full_env();
            env.insert(DEBUG_VAR.to_string(), raw.to_string());
            assert!(Settings::from_map(&env).unwrap().debug, "raw = {}", raw);
        }

        let mut env = full_env();
        env.insert(DEBUG_VAR.to_string(), "off".to_string());
        assert!(!Settings::from_map(&env).unwrap().debug);
    }

    #[test]
    fn test_env_file_overrides_inherited_values() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}=from-file", DEEPGRAM_API_KEY_VAR).unwrap();
        writeln!(file, "{}=notion-key", NOTION_API_KEY_VAR).unwrap();
        writeln!(file, "{}=db-123", NOTION_DATABASE_ID_VAR).unwrap();

        let settings = Settings::from_env_file(Some(file.path())).unwrap();
        assert_eq!(settings.deepgram_api_key, "from-file");
    }
}
