//! Application configuration.
//!
//! Built once at startup and passed explicitly to the store and the remote
//! client.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const NOTES_FILE_VAR: &str = "NOTES_FILE";
const BASE_URL_VAR: &str = "GEMINI_BASE_URL";
const MODEL_VAR: &str = "GEMINI_MODEL";
const EMBEDDING_MODEL_VAR: &str = "GEMINI_EMBEDDING_MODEL";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON document holding all notes.
    pub notes_file: PathBuf,
    /// Credential for the remote API. AI features are disabled without it.
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub generation_model: String,
    pub embedding_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes_file: default_notes_file(),
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            notes_file: get(NOTES_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.notes_file),
            api_key: get(API_KEY_VAR),
            api_base_url: get(BASE_URL_VAR).unwrap_or(defaults.api_base_url),
            generation_model: get(MODEL_VAR).unwrap_or(defaults.generation_model),
            embedding_model: get(EMBEDDING_MODEL_VAR).unwrap_or(defaults.embedding_model),
        }
    }

    /// Overrides the notes file, typically from the `--file` flag.
    pub fn with_notes_file(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.notes_file = path;
        }
        self
    }

    /// Returns true when an API key is configured.
    pub fn ai_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Returns `{data_dir}/smart-notes/notes.json`, or `my_notes/notes.json`
/// under the working directory when no data directory is known.
///
/// `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn default_notes_file() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("smart-notes").join("notes.json"),
        None => PathBuf::from("my_notes").join("notes.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup(&[]));

        assert_eq!(config.api_key, None);
        assert!(!config.ai_enabled());
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.generation_model, DEFAULT_GENERATION_MODEL);
        assert_eq!(config.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert!(config.notes_file.ends_with("notes.json"));
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "secret"),
            ("NOTES_FILE", "/tmp/n.json"),
            ("GEMINI_BASE_URL", "http://localhost:1234"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("GEMINI_EMBEDDING_MODEL", "embed-1"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert!(config.ai_enabled());
        assert_eq!(config.notes_file, PathBuf::from("/tmp/n.json"));
        assert_eq!(config.api_base_url, "http://localhost:1234");
        assert_eq!(config.generation_model, "gemini-pro");
        assert_eq!(config.embedding_model, "embed-1");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "  "), ("GEMINI_MODEL", "")]));
        assert_eq!(config.api_key, None);
        assert_eq!(config.generation_model, DEFAULT_GENERATION_MODEL);
    }

    #[test]
    fn cli_file_overrides_environment() {
        let config = Config::from_lookup(lookup(&[("NOTES_FILE", "/env/notes.json")]))
            .with_notes_file(Some(PathBuf::from("/cli/notes.json")));
        assert_eq!(config.notes_file, PathBuf::from("/cli/notes.json"));

        let config = Config::from_lookup(lookup(&[("NOTES_FILE", "/env/notes.json")]))
            .with_notes_file(None);
        assert_eq!(config.notes_file, PathBuf::from("/env/notes.json"));
    }

    #[test]
    fn default_notes_file_is_under_smart_notes() {
        let path = default_notes_file();
        assert!(path.ends_with("notes.json"));
        assert!(path.to_string_lossy().contains("smart-notes") || path.starts_with("my_notes"));
    }

    #[test]
    #[serial]
    fn from_env_reads_process_environment() {
        unsafe {
            std::env::set_var("GEMINI_MODEL", "env-model");
        }

        let config = Config::from_env();
        assert_eq!(config.generation_model, "env-model");

        unsafe {
            std::env::remove_var("GEMINI_MODEL");
        }
    }
}
