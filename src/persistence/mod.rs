//! Save/load persistence
//!
//! Every persisted record is a small JSON file inside one data directory.
//! Writes go to a temp file first and are renamed over the old save, so a
//! crash mid-write leaves the previous file intact.
//!
//! Loading never fails the caller: a missing or malformed file is logged and
//! replaced by the record's default.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A value persisted as its own JSON file
pub trait Record: Serialize + DeserializeOwned + Default {
    /// File name inside the data directory
    const FILE_NAME: &'static str;
}

/// Persistence failure
#[derive(Debug)]
pub enum PersistError {
    /// Filesystem access failed
    Io { path: PathBuf, source: io::Error },
    /// File content was not valid JSON for the record
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "malformed json in {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Directory-backed record store
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a record's file
    pub fn path_of<R: Record>(&self) -> PathBuf {
        self.dir.join(R::FILE_NAME)
    }

    /// Load a record, reporting missing or malformed files as errors
    pub fn load<R: Record>(&self) -> Result<R, PersistError> {
        let path = self.path_of::<R>();
        let json = fs::read_to_string(&path).map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| PersistError::Json { path, source })
    }

    /// Load a record, falling back to its default on any failure
    pub fn load_or_default<R: Record>(&self) -> R {
        match self.load::<R>() {
            Ok(record) => {
                log::debug!("Loaded {}", R::FILE_NAME);
                record
            }
            Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::info!("No {} found, starting fresh", R::FILE_NAME);
                R::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable save: {e}");
                R::default()
            }
        }
    }

    /// Write a record (temp file, then rename over the old save)
    pub fn save<R: Record>(&self, record: &R) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_of::<R>();
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(record).map_err(|source| PersistError::Json {
            path: path.clone(),
            source,
        })?;

        fs::write(&tmp, json).map_err(|source| PersistError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;

        log::debug!("Saved {}", R::FILE_NAME);
        Ok(())
    }

    /// Save and log instead of propagating; for end-of-session bookkeeping
    pub fn save_or_warn<R: Record>(&self, record: &R) {
        if let Err(e) = self.save(record) {
            log::warn!("Failed to save {}: {e}", R::FILE_NAME);
        }
    }
}
