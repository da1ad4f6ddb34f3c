//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout (config dir):
//!   Windows: %APPDATA%\phonemizer\
//!   macOS:   ~/Library/Application Support/phonemizer/
//!   Linux:   ~/.config/phonemizer/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `phoneme-dict.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Default location of the phonetic dictionary.
    pub dictionary_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "phonemizer";

    /// Falls back to the current directory if the platform cannot provide a
    /// config directory.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let dictionary_file = config_dir.join("phoneme-dict.json");

        Self {
            config_dir,
            settings_file,
            dictionary_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
