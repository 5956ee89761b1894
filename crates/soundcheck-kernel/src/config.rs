//! `soundcheck.toml`: where the documents live and how to judge them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::AUDIO_EXTENSIONS;
use crate::crossref::Coverage;
use crate::diagnostics::Mode;

/// Configuration file name looked up at the soundboard root.
pub const CONFIG_FILE: &str = "soundcheck.toml";

/// Validation settings. Every key is optional; relative paths are
/// resolved against the soundboard root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sounds_file: PathBuf,
    pub commands_file: PathBuf,
    pub slash_commands_file: PathBuf,
    /// Directory walked for unreferenced audio files.
    pub audio_dir: PathBuf,
    pub audio_extensions: Vec<String>,
    pub mode: Mode,
    pub coverage: Coverage,
    /// Pass when only warnings remain.
    pub allow_warnings: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sounds_file: PathBuf::from("sounds.json"),
            commands_file: PathBuf::from("commands.json"),
            slash_commands_file: PathBuf::from("commands_slash.json"),
            audio_dir: PathBuf::from("audio"),
            audio_extensions: AUDIO_EXTENSIONS.iter().map(|e| (*e).to_owned()).collect(),
            mode: Mode::default(),
            coverage: Coverage::default(),
            allow_warnings: false,
        }
    }
}

impl Config {
    /// Read `soundcheck.toml` from `root`, or the defaults if there is none.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config{}: {message}", location(path.as_deref()))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
}

fn location(path: Option<&Path>) -> String {
    path.map(|p| format!(" {}", p.display())).unwrap_or_default()
}
