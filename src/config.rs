use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{JournalError, Result};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory where the journal's collections are stored
    pub data_dir: PathBuf,

    /// Editor command used by `--edit`
    pub editor_command: Option<String>,

    /// Whether deletions ask for confirmation
    pub confirm_deletes: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".keepsake"));

        Self {
            data_dir,
            editor_command: None,
            confirm_deletes: true,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "keepsake")
}

impl Config {
    /// Where the configuration lives unless `--config` says otherwise.
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from(".keepsake").join("config.json"))
    }

    /// Reads the configuration at `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to parse config {}: {}", path.display(), e);
            JournalError::ConfigError {
                message: format!("{} is not a valid config file: {}", path.display(), e),
            }
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create config directory: {}", e);
                    JournalError::DirectoryError {
                        path: parent.to_path_buf(),
                    }
                })?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Applies a `key=value` setting.
    pub fn set(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| JournalError::ConfigError {
                message: format!("Expected key=value, got '{}'", assignment),
            })?;
        let value = value.trim();

        match key.trim() {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "editor_command" => {
                self.editor_command = (!value.is_empty()).then(|| value.to_string());
            }
            "confirm_deletes" => {
                self.confirm_deletes = value.parse().map_err(|_| JournalError::ConfigError {
                    message: format!("confirm_deletes must be true or false, got '{}'", value),
                })?;
            }
            other => {
                return Err(JournalError::ConfigError {
                    message: format!("Unknown setting '{}'", other),
                })
            }
        }
        Ok(())
    }

    /// Configured editor, then `$EDITOR`, then whatever the platform has.
    pub fn get_editor_command(&self) -> String {
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -W -t".to_string()
        } else {
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}
