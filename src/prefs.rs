//! Persisted user preferences behind a small key-value port.
//!
//! Only the desktop front end talks to a [`PreferenceStore`]; neither the
//! window manager nor the shell session knows it exists.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::theme::ThemeKind;

const KEY_THEME: &str = "theme";
const KEY_SKIP_WELCOME: &str = "skip_welcome";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to access preferences file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("preferences file '{path}' is corrupted: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Volatile store, used when no preferences file is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A flat TOML table of strings, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `path`, treating a missing file as empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).map_err(|source| PrefsError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PrefsError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    fn persist(&self) -> Result<(), PrefsError> {
        let io_err = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = toml::to_string(&self.values)?;
        fs::write(&self.path, raw).map_err(io_err)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: ThemeKind,
    pub skip_welcome: bool,
}

impl Preferences {
    /// Read preferences, falling back to defaults for missing or invalid
    /// values.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let theme = store
            .get(KEY_THEME)
            .and_then(|raw| match raw.parse() {
                Ok(theme) => Some(theme),
                Err(err) => {
                    tracing::warn!(%err, "ignoring stored theme");
                    None
                }
            })
            .unwrap_or_default();
        let skip_welcome = store
            .get(KEY_SKIP_WELCOME)
            .is_some_and(|raw| raw.trim() == "true");
        Self {
            theme,
            skip_welcome,
        }
    }

    pub fn save(&self, store: &mut dyn PreferenceStore) -> Result<(), PrefsError> {
        store.set(KEY_THEME, &self.theme.to_string())?;
        store.set(KEY_SKIP_WELCOME, if self.skip_welcome { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(Preferences::load(&store), Preferences::default());
        let prefs = Preferences {
            theme: ThemeKind::Light,
            skip_welcome: true,
        };
        prefs.save(&mut store).unwrap();
        assert_eq!(Preferences::load(&store), prefs);
    }

    #[test]
    fn invalid_theme_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set("theme", "neon").unwrap();
        assert_eq!(Preferences::load(&store).theme, ThemeKind::Dark);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");
        let mut store = FileStore::open(&path).unwrap();
        Preferences {
            theme: ThemeKind::Light,
            skip_welcome: true,
        }
        .save(&mut store)
        .unwrap();

        let reopened = FileStore::open(&path).unwrap();
        let prefs = Preferences::load(&reopened);
        assert_eq!(prefs.theme, ThemeKind::Light);
        assert!(prefs.skip_welcome);
    }

    #[test]
    fn corrupted_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "theme = [1, 2").unwrap();
        assert!(matches!(
            FileStore::open(&path),
            Err(PrefsError::Parse { .. })
        ));
    }
}
