//! # Configuration
//!
//! Engine configuration is managed by [`confique`], layering environment
//! variables over an optional TOML file over compiled defaults. This is
//! configuration of the engine itself (where persisted state lives), not
//! the user's [`crate::settings::Settings`].
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `DECKTAG_DATA_DIR`, `DECKTAG_SETTINGS_KEY`.
//! 2. **Config file**: `decktag.toml`, if the caller passes one.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data dir (via `directories`) | Root of the JSON blob store |
//! | `settings_key` | `settings` | Storage key of the settings object |

use std::path::{Path, PathBuf};

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::settings::DEFAULT_SETTINGS_KEY;
use crate::store::FsBackend;

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DeckConfig {
    /// Directory holding persisted blobs.
    /// When absent, the platform data directory is used.
    #[config(env = "DECKTAG_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Storage key the settings object is persisted under.
    #[config(default = "settings", env = "DECKTAG_SETTINGS_KEY")]
    pub settings_key: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            settings_key: DEFAULT_SETTINGS_KEY.to_string(),
        }
    }
}

impl DeckConfig {
    /// Load from the environment, then `file` if given, then defaults.
    /// A missing file is ignored.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    /// Load from a file and defaults only, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::builder().file(path).load()?)
    }

    /// The configured data directory, or the platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        ProjectDirs::from("com", "decktag", "decktag")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| DeckError::Store("Could not determine data directory".to_string()))
    }

    pub fn fs_backend(&self) -> Result<FsBackend> {
        Ok(FsBackend::new(self.data_dir()?))
    }
}
