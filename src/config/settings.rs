//! Phonemizer settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::dictionary::{DictionaryError, PhoneticDictionary};
use crate::text::DEFAULT_PUNCTUATION;

// ---------------------------------------------------------------------------
// TextConfig
// ---------------------------------------------------------------------------

/// Segmentation and acronym settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Delimiter characters.  A space is always added on top.
    pub punctuation: String,
    /// Spell out all-uppercase words (`SPD` → `S-P-D`).
    pub expand_acronyms: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            punctuation: DEFAULT_PUNCTUATION.into(),
            expand_acronyms: true,
        }
    }
}

// ---------------------------------------------------------------------------
// DictionaryConfig
// ---------------------------------------------------------------------------

/// Where the phonetic dictionary comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// JSON file `{ "<lang>": { "<word>": "<phonemes>" } }`.  `None` falls
    /// back to `phoneme-dict.json` in the config directory; without that
    /// file every word goes to the predictor.
    pub path: Option<PathBuf>,
}

impl DictionaryConfig {
    /// Load the configured dictionary, or the one at the default location.
    pub fn load(&self) -> Result<Option<PhoneticDictionary>, DictionaryError> {
        self.load_or(&AppPaths::new().dictionary_file)
    }

    /// Load the configured dictionary, falling back to `default` when no
    /// path is set and that file exists.  An explicit path must exist.
    pub fn load_or(&self, default: &Path) -> Result<Option<PhoneticDictionary>, DictionaryError> {
        match self.path.as_deref() {
            Some(path) => PhoneticDictionary::load_from(path).map(Some),
            None if default.is_file() => PhoneticDictionary::load_from(default).map(Some),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// PredictorConfig
// ---------------------------------------------------------------------------

/// Settings for the remote predictor backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Base URL of the phonemization service.
    pub base_url: String,
    /// API key — `None` for local services.
    pub api_key: Option<String>,
    /// Model / checkpoint identifier sent with every request.
    pub model: String,
    /// Maximum seconds to wait for one batch.
    pub timeout_secs: u64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            api_key: None,
            model: "de_us_nostress".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// ```toml
/// language = "de"
///
/// [text]
/// punctuation = "().,:?!"
/// expand_acronyms = true
///
/// [dictionary]
/// path = "/usr/share/phonemizer/de.json"
///
/// [predictor]
/// base_url = "http://localhost:8080"
/// model = "de_us_nostress"
/// timeout_secs = 30
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default language code.
    pub language: String,
    pub text: TextConfig,
    pub dictionary: DictionaryConfig,
    pub predictor: PredictorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: "de".into(),
            text: TextConfig::default(),
            dictionary: DictionaryConfig::default(),
            predictor: PredictorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
