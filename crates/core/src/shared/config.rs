use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    ANKI_CONNECT_URL, DEEPSEEK_CHAT_URL, DEEPSEEK_MODEL, DEFAULT_CLIPS_DIR, DEFAULT_CONTEXT_DIR,
    DEFAULT_DECKS_DIR, DEFAULT_MUSIC_DIR, DEFAULT_STORE_TIMEOUT_SECS,
    DEFAULT_TRANSLATION_TIMEOUT_SECS, OPENAI_CHAT_URL, OPENAI_MODEL,
};
use super::retry::RetryPolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Chat-completion backend used for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    Deepseek,
    Openai,
}

impl TranslationProvider {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            TranslationProvider::Deepseek => DEEPSEEK_CHAT_URL,
            TranslationProvider::Openai => OPENAI_CHAT_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            TranslationProvider::Deepseek => DEEPSEEK_MODEL,
            TranslationProvider::Openai => OPENAI_MODEL,
        }
    }

    /// Environment variable the CLI consults for this provider's key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            TranslationProvider::Deepseek => "DEEPSEEK_API_KEY",
            TranslationProvider::Openai => "OPENAI_API_KEY",
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationProvider::Deepseek => write!(f, "deepseek"),
            TranslationProvider::Openai => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deepseek" => Ok(TranslationProvider::Deepseek),
            "openai" => Ok(TranslationProvider::Openai),
            other => Err(format!(
                "unknown translation provider '{other}', expected deepseek or openai"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub provider: TranslationProvider,
    /// Overrides the provider's default endpoint.
    pub endpoint: Option<String>,
    /// Overrides the provider's default model.
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl TranslationConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::Deepseek,
            endpoint: None,
            model: None,
            api_key: None,
            timeout_secs: DEFAULT_TRANSLATION_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashcardStoreConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl FlashcardStoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FlashcardStoreConfig {
    fn default() -> Self {
        Self {
            url: ANKI_CONNECT_URL.to_string(),
            timeout_secs: DEFAULT_STORE_TIMEOUT_SECS,
        }
    }
}

/// Application configuration, built once at startup and passed by reference
/// to everything that touches the filesystem layout or an external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub music_dir: PathBuf,
    pub clips_dir: PathBuf,
    pub decks_dir: PathBuf,
    pub context_dir: PathBuf,
    pub translation: TranslationConfig,
    pub flashcard_store: FlashcardStoreConfig,
    pub retry: RetryPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            music_dir: PathBuf::from(DEFAULT_MUSIC_DIR),
            clips_dir: PathBuf::from(DEFAULT_CLIPS_DIR),
            decks_dir: PathBuf::from(DEFAULT_DECKS_DIR),
            context_dir: PathBuf::from(DEFAULT_CONTEXT_DIR),
            translation: TranslationConfig::default(),
            flashcard_store: FlashcardStoreConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Platform config location: `<config dir>/SongDeck/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("SongDeck").join("config.json"))
    }

    /// Reads a JSON config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Loads the explicit path if given, else the default location when it
    /// exists, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                log::debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_directory_layout() {
        let config = AppConfig::default();
        assert_eq!(config.music_dir, PathBuf::from("music"));
        assert_eq!(config.clips_dir, PathBuf::from("audio_clips"));
        assert_eq!(config.decks_dir, PathBuf::from("anki_decks"));
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn test_translation_defaults_follow_provider() {
        let mut translation = TranslationConfig::default();
        assert_eq!(translation.endpoint(), DEEPSEEK_CHAT_URL);
        assert_eq!(translation.model(), "deepseek-chat");

        translation.provider = TranslationProvider::Openai;
        assert_eq!(translation.endpoint(), OPENAI_CHAT_URL);
        assert_eq!(translation.model(), "gpt-4o");

        translation.model = Some("gpt-4o-mini".to_string());
        assert_eq!(translation.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{"music_dir": "songs", "translation": {"provider": "openai"}}"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.music_dir, PathBuf::from("songs"));
        assert_eq!(config.clips_dir, PathBuf::from("audio_clips"));
        assert_eq!(config.translation.provider, TranslationProvider::Openai);
        assert_eq!(
            config.translation.timeout_secs,
            DEFAULT_TRANSLATION_TIMEOUT_SECS
        );
    }

    #[test]
    fn test_load_invalid_json_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_resolve_explicit_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let result = AppConfig::resolve(Some(&tmp.path().join("absent.json")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(
            "DeepSeek".parse::<TranslationProvider>().unwrap(),
            TranslationProvider::Deepseek
        );
        assert!("claude".parse::<TranslationProvider>().is_err());
    }
}
