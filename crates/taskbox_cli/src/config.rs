use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use taskbox_core::{EditTitlePolicy, SessionSettings, StoragePolicy, DEFAULT_PAGE_URL};

const APP_NAME: &str = "taskbox";
const DB_FILE_NAME: &str = "taskbox.sqlite3";
const CONFIG_PATH_ENV: &str = "TASKBOX_CONFIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub editing: EditingConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file; defaults to the platform data directory.
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub on_malformed: StoragePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditingConfig {
    #[serde(default)]
    pub title_policy: EditTitlePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareConfig {
    pub page_url: Option<String>,
}

/// External programs used for clipboard and browser access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub clipboard_command: Option<Vec<String>>,
    pub browser_command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            storage_policy: self.storage.on_malformed,
            edit_title_policy: self.editing.title_policy,
            page_url: self
                .share
                .page_url
                .clone()
                .unwrap_or_else(|| DEFAULT_PAGE_URL.to_string()),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME).context("Could not determine home directory")
}

pub fn get_config_file() -> Result<PathBuf> {
    // TASKBOX_CONFIG_PATH points at the config file itself
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn get_db_path(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.storage.path {
        return Ok(path.clone());
    }
    Ok(project_dirs()?.data_dir().join(DB_FILE_NAME))
}

pub fn get_log_dir(config: &Config) -> Result<PathBuf> {
    if let Some(dir) = &config.logging.dir {
        return Ok(dir.clone());
    }
    Ok(project_dirs()?.data_dir().join("logs"))
}

/// Loads `explicit` or the default config file; a missing file yields defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config_file = match explicit {
        Some(path) => path.to_path_buf(),
        None => get_config_file()?,
    };

    if !config_file.exists() {
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed to read config file: {}", config_file.display()))?;
    parse_config(&contents)
        .with_context(|| format!("Failed to parse config file: {}", config_file.display()))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::{load_config, parse_config, Config};
    use taskbox_core::{EditTitlePolicy, StoragePolicy, DEFAULT_PAGE_URL};

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());

        let settings = config.session_settings();
        assert_eq!(settings.storage_policy, StoragePolicy::Strict);
        assert_eq!(settings.edit_title_policy, EditTitlePolicy::Verbatim);
        assert_eq!(settings.page_url, DEFAULT_PAGE_URL);
    }

    #[test]
    fn full_file_maps_onto_session_settings() {
        let config = parse_config(
            r#"
            [storage]
            path = "/tmp/tasks.sqlite3"
            on_malformed = "reset"

            [editing]
            title_policy = "require_title"

            [share]
            page_url = "https://example.org/tasks"

            [platform]
            clipboard_command = ["wl-copy"]
            "#,
        )
        .unwrap();

        let settings = config.session_settings();
        assert_eq!(settings.storage_policy, StoragePolicy::ResetOnMalformed);
        assert_eq!(settings.edit_title_policy, EditTitlePolicy::RequireTitle);
        assert_eq!(settings.page_url, "https://example.org/tasks");
        assert_eq!(
            config.platform.clipboard_command,
            Some(vec!["wl-copy".to_string()])
        );
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(parse_config("[storage]\non_malformed = \"ignore\"").is_err());
    }

    #[test]
    fn missing_explicit_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }
}
