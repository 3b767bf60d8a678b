//! Console settings persisted outside the egui state.
//!
//! Backend endpoints live in a TOML file under the platform config
//! directory so operators can point the console at staging or production
//! without rebuilding. `REFCONSOLE_STORE_URL` and `REFCONSOLE_GENERATION_URL`
//! override the file for one-off runs.

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the config store backend. `None` runs against the
    /// in-memory store.
    pub store_url: Option<String>,
    /// Base URL of the generation/translation service.
    pub generation_url: Option<String>,
    /// Language codes offered in the translate menu.
    pub translation_languages: Vec<String>,
}

impl Settings {
    /// Load settings from disk, then apply environment overrides. A
    /// missing file yields defaults; a malformed file is reported and
    /// replaced by defaults rather than aborting startup.
    pub fn load() -> Self {
        let mut settings = match Self::config_path() {
            Some(path) if path.exists() => match Self::read_from(&path) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("failed to read settings from {:?}: {}", path, e);
                    Settings::default()
                }
            },
            _ => Settings::default(),
        };

        if let Ok(url) = std::env::var("REFCONSOLE_STORE_URL") {
            if !url.is_empty() {
                settings.store_url = Some(url);
            }
        }
        if let Ok(url) = std::env::var("REFCONSOLE_GENERATION_URL") {
            if !url.is_empty() {
                settings.generation_url = Some(url);
            }
        }
        if settings.translation_languages.is_empty() {
            settings.translation_languages = default_languages();
        }

        settings
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("no config directory available")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {:?}", parent))?;
        }
        let rendered = toml::to_string_pretty(self).context("serializing settings")?;
        std::fs::write(&path, rendered).with_context(|| format!("writing {:?}", path))?;
        info!("settings saved to {:?}", path);
        Ok(())
    }

    fn read_from(path: &PathBuf) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        toml::from_str(&raw).context("parsing settings TOML")
    }

    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "", "refconsole")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
    }
}

fn default_languages() -> Vec<String> {
    ["de", "fr", "es", "pt", "ja", "ko"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip() {
        let settings = Settings {
            store_url: Some("https://config.example.com/api".to_string()),
            generation_url: None,
            translation_languages: vec!["de".to_string()],
        };
        let rendered = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.store_url, settings.store_url);
        assert_eq!(parsed.translation_languages, vec!["de".to_string()]);
    }

    #[test]
    fn defaults_for_missing_fields() {
        let parsed: Settings = toml::from_str("").unwrap();
        assert!(parsed.store_url.is_none());
        assert!(parsed.translation_languages.is_empty());
    }
}
