use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "exambank";
const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "exambank.log";

/// Longest accepted search delay, in milliseconds
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Application configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding `db/` and `exam/`, used when `--db` is not given
    #[serde(default)]
    pub catalog_root: Option<PathBuf>,

    /// Delay between the last keystroke and the search, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    250
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_root: None,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl AppConfig {
    /// Load config from the app data directory, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .context("Failed to read config file")?;
            let config: AppConfig = serde_json::from_str(&content)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Search delay, capped at [`MAX_DEBOUNCE_MS`]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.min(MAX_DEBOUNCE_MS))
    }

    /// Catalog root: explicit argument, then config, then the current directory
    pub fn effective_catalog_root(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.catalog_root.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the path of the log file written while the TUI owns the terminal
pub fn get_log_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(LOG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.catalog_root, None);
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_app_config_partial_json() {
        // Should use defaults for missing fields
        let json = r#"{"catalog_root": "/srv/exams"}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.catalog_root, Some(PathBuf::from("/srv/exams")));
        assert_eq!(config.debounce_ms, 250);
    }

    #[test]
    fn test_app_config_empty_json() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_app_config_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"catalog_root": "/srv/exams", "debounce_ms": 100}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.catalog_root, Some(PathBuf::from("/srv/exams")));
        assert_eq!(config.debounce(), Duration::from_millis(100));
    }

    #[test]
    fn test_app_config_huge_debounce_is_capped() {
        let config: AppConfig =
            serde_json::from_str(&format!(r#"{{"debounce_ms": {}}}"#, u64::MAX)).unwrap();
        assert_eq!(config.debounce(), Duration::from_millis(MAX_DEBOUNCE_MS));
    }

    #[test]
    fn test_app_config_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_effective_catalog_root() {
        let mut config = AppConfig::default();
        assert_eq!(config.effective_catalog_root(None), PathBuf::from("."));

        config.catalog_root = Some(PathBuf::from("/srv/exams"));
        assert_eq!(config.effective_catalog_root(None), PathBuf::from("/srv/exams"));
        assert_eq!(
            config.effective_catalog_root(Some(Path::new("/tmp/other"))),
            PathBuf::from("/tmp/other")
        );
    }
}
