//! Key-value storage behind the note snapshot and the theme preference.
//!
//! Two backends are provided: an in-process map (optionally capped to mimic a
//! browser storage quota) and a directory holding one file per key.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::StorageError;
use crate::note::Note;
use crate::theme::Theme;

pub const NOTES_KEY: &str = "notes";
pub const THEME_KEY: &str = "theme";

pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the whole value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects writes once the total stored bytes would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self { entries: HashMap::new(), quota: Some(bytes) }
    }

    pub fn set_quota(&mut self, bytes: Option<usize>) {
        self.quota = bytes;
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for DirStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Write beside the target and rename so readers never see half a snapshot.
        let path = self.key_path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Outcome of reading the snapshot key.
#[derive(Debug)]
pub enum Snapshot {
    Missing,
    Notes(Vec<Note>),
    Corrupt(serde_json::Error),
}

pub fn read_notes<S: Storage + ?Sized>(storage: &S) -> Result<Snapshot, StorageError> {
    let Some(raw) = storage.get(NOTES_KEY)? else {
        return Ok(Snapshot::Missing);
    };
    if raw.trim().is_empty() {
        return Ok(Snapshot::Missing);
    }
    Ok(match serde_json::from_str::<Vec<Note>>(&raw) {
        Ok(notes) => Snapshot::Notes(notes),
        Err(e) => Snapshot::Corrupt(e),
    })
}

pub fn write_notes<S: Storage + ?Sized>(
    storage: &mut S,
    notes: &[Note],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(notes).map_err(io::Error::other)?;
    storage.set(NOTES_KEY, &raw)
}

/// Unknown or unreadable values fall back to the default theme.
pub fn read_theme<S: Storage + ?Sized>(storage: &S) -> Theme {
    match storage.get(THEME_KEY) {
        Ok(Some(raw)) => {
            // Older data directories hold the bare name instead of a JSON string.
            let name = serde_json::from_str::<String>(&raw).unwrap_or(raw);
            Theme::parse(name.trim()).unwrap_or_else(|| {
                log::warn!("unknown theme preference {name:?}, using default");
                Theme::default()
            })
        }
        Ok(None) => Theme::default(),
        Err(e) => {
            log::warn!("could not read theme preference: {e}");
            Theme::default()
        }
    }
}

pub fn write_theme<S: Storage + ?Sized>(
    storage: &mut S,
    theme: Theme,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(theme.as_str()).map_err(io::Error::other)?;
    storage.set(THEME_KEY, &raw)
}
