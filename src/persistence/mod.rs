//! Save/load persistence
//!
//! Features:
//! - JSON files for settings, tuning and high scores
//! - Atomic save (write tmp, then rename over the old file)
//! - Missing or corrupt files fall back to defaults with a warning

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::highscores::HighScores;
use crate::settings::Settings;
use crate::tuning::Tuning;

pub const SETTINGS_FILE: &str = "settings.json";
pub const TUNING_FILE: &str = "tuning.json";
pub const HIGHSCORES_FILE: &str = "highscores.json";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read or write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON, replacing the file atomically
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(value).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

/// Load `path`, or `T::default()` if it is missing or unreadable
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path) {
        Ok(value) => {
            log::info!("Loaded {}", path.display());
            value
        }
        Err(PersistenceError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::info!("No {} found, using defaults", path.display());
            T::default()
        }
        Err(err) => {
            log::warn!("{err}, using defaults");
            T::default()
        }
    }
}

/// Directory holding every file the game persists
#[derive(Debug, Clone)]
pub struct SaveDir {
    root: PathBuf,
}

impl SaveDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE)
    }

    pub fn tuning_path(&self) -> PathBuf {
        self.root.join(TUNING_FILE)
    }

    pub fn highscores_path(&self) -> PathBuf {
        self.root.join(HIGHSCORES_FILE)
    }

    pub fn load_settings(&self) -> Settings {
        load_or_default(&self.settings_path())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), PersistenceError> {
        save_json(&self.settings_path(), settings)?;
        log::info!("Settings saved");
        Ok(())
    }

    pub fn load_tuning(&self) -> Tuning {
        load_or_default::<Tuning>(&self.tuning_path()).sanitized()
    }

    pub fn load_highscores(&self) -> HighScores {
        let scores: HighScores = load_or_default(&self.highscores_path());
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    pub fn save_highscores(&self, scores: &HighScores) -> Result<(), PersistenceError> {
        save_json(&self.highscores_path(), scores)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}
