//! Run configuration: dataset paths and ALS hyper-parameters, persisted as TOML.
//!
//! ```toml
//! [data]
//! interactions = "dataset/hetrec2011-lastfm-2k/user_artists.dat"
//! artists = "dataset/hetrec2011-lastfm-2k/artists.dat"
//!
//! [model]
//! factors = 50
//! iterations = 10
//! regularization = 0.01
//! ```

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::AlsParams;

/// Errors from configuration files.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(artist_rec::config::read),
        help("Ensure the config file exists, or create one with `artist-rec init-config <path>`.")
    )]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(artist_rec::config::parse),
        help("Check the TOML syntax. Known sections are [data] and [model].")
    )]
    ConfigParse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(artist_rec::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    ConfigWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Locations of the two input files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    /// Tab-separated `userID artistID weight` log.
    #[serde(default = "default_interactions")]
    pub interactions: PathBuf,
    /// Tab-separated artist catalog with `id` and `name` columns.
    #[serde(default = "default_artists")]
    pub artists: PathBuf,
}

fn default_interactions() -> PathBuf {
    PathBuf::from("dataset/hetrec2011-lastfm-2k/user_artists.dat")
}
fn default_artists() -> PathBuf {
    PathBuf::from("dataset/hetrec2011-lastfm-2k/artists.dat")
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            interactions: default_interactions(),
            artists: default_artists(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecConfig {
    #[serde(default)]
    pub data: DataPaths,
    #[serde(default)]
    pub model: AlsParams,
}

impl RecConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::ConfigParse {
            path: path.display().to_string(),
            message,
        })
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ConfigWrite {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::ConfigWrite {
            path: path.display().to_string(),
            source: e,
        })
    }
}
