use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::shared::error::{UnitsError, UnitsResult};

/// Deepest undo history a field set keeps
pub const MAX_HISTORY_SIZE: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    pub catalog: CatalogSettings,
    pub history: HistorySettings,
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// JSON catalog file; the built-in catalog is used when unset
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            limit: MAX_HISTORY_SIZE,
        }
    }
}

impl HistorySettings {
    /// Configured limit, kept within 1..=MAX_HISTORY_SIZE
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_HISTORY_SIZE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// System selected by new, empty fields instead of the first one listed
    pub default_system: Option<String>,
}

impl ConverterSettings {
    pub fn get_settings_path() -> UnitsResult<PathBuf> {
        ProjectDirs::from("org", "units", "units-of-measure")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| UnitsError::Settings("Failed to determine config directory".to_string()))
    }

    /// Load settings from the platform config directory, writing defaults on first run
    pub async fn load() -> UnitsResult<Self> {
        let path = Self::get_settings_path()?;
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> UnitsResult<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save_to(path).await?;
            tracing::debug!(path = %path.display(), "[Settings] Wrote default settings");
            return Ok(settings);
        }

        let content = fs::read_to_string(path).await
            .map_err(|e| UnitsError::Settings(format!("Failed to read settings file: {}", e)))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> UnitsResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| UnitsError::Settings(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save_to(&self, path: &Path) -> UnitsResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| UnitsError::Settings(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content).await
            .map_err(|e| UnitsError::Settings(format!("Failed to write settings file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("units-of-measure-{}-{}", name, std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings = ConverterSettings::from_json(r#"{ "preferences": { "default_system": "US" } }"#).unwrap();
        assert_eq!(settings.preferences.default_system.as_deref(), Some("US"));
        assert_eq!(settings.history.limit, MAX_HISTORY_SIZE);
        assert!(settings.catalog.path.is_none());
    }

    #[test]
    fn test_history_limit_is_clamped() {
        assert_eq!(HistorySettings { limit: 10 }.effective_limit(), MAX_HISTORY_SIZE);
        assert_eq!(HistorySettings { limit: 0 }.effective_limit(), 1);
        assert_eq!(HistorySettings { limit: 2 }.effective_limit(), 2);
    }

    #[test]
    fn test_malformed_settings() {
        let err = ConverterSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, UnitsError::Settings(_)));
    }

    #[tokio::test]
    async fn test_load_writes_defaults_then_reads_back() {
        let path = scratch_path("defaults");
        let _ = fs::remove_file(&path).await;

        let first = ConverterSettings::load_from(&path).await.unwrap();
        assert_eq!(first, ConverterSettings::default());
        assert!(path.exists());

        let mut changed = first.clone();
        changed.history.limit = 2;
        changed.save_to(&path).await.unwrap();

        let second = ConverterSettings::load_from(&path).await.unwrap();
        assert_eq!(second.history.limit, 2);

        let _ = fs::remove_file(&path).await;
    }
}
