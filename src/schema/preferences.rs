//! Small persisted user preferences (preferred speed, display language).
//!
//! Stores are fire-and-forget: reads that fail yield `None`, writes that fail
//! are logged and dropped. Nothing here can interrupt playback.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys a preference store understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    /// Language of the code panel.
    DisplayLanguage,
    /// Last accepted playback speed.
    PlaybackSpeed,
}

impl PreferenceKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DisplayLanguage => "preferred_language",
            Self::PlaybackSpeed => "playback_speed",
        }
    }
}

/// Language used for the code snippets panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayLanguage {
    #[default]
    Java,
    Python,
    Golang,
    Javascript,
}

/// Key/value preference store.
pub trait Preferences {
    /// Stored value for `key`, or `None` when absent or unreadable.
    fn get(&self, key: PreferenceKey) -> Option<Value>;

    /// Store `value` under `key`. Failures are swallowed.
    fn set(&mut self, key: PreferenceKey, value: Value);

    /// Stored playback speed, if it is a positive finite number.
    fn playback_speed(&self) -> Option<f64> {
        self.get(PreferenceKey::PlaybackSpeed)
            .and_then(|v| v.as_f64())
            .filter(|s| s.is_finite() && *s > 0.0)
    }

    /// Stored display language, if recognised.
    fn display_language(&self) -> Option<DisplayLanguage> {
        self.get(PreferenceKey::DisplayLanguage)
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

/// Preference persistence errors. Never surfaced past the store.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("Preference file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Process-local store, used by tests and the browser build.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, Value>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: PreferenceKey) -> Option<Value> {
        self.values.get(key.as_str()).cloned()
    }

    fn set(&mut self, key: PreferenceKey, value: Value) {
        self.values.insert(key.as_str().to_string(), value);
    }
}

/// Store backed by a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
}

impl JsonFilePreferences {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Value>, PreferenceError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn try_set(&self, key: PreferenceKey, value: Value) -> Result<(), PreferenceError> {
        // An unreadable file is replaced rather than blocking the write.
        let mut values = self.load().unwrap_or_default();
        values.insert(key.as_str().to_string(), value);
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

impl Preferences for JsonFilePreferences {
    fn get(&self, key: PreferenceKey) -> Option<Value> {
        match self.load() {
            Ok(mut values) => values.remove(key.as_str()),
            Err(e) => {
                log::warn!("Ignoring preferences at {}: {e}", self.path.display());
                None
            }
        }
    }

    fn set(&mut self, key: PreferenceKey, value: Value) {
        if let Err(e) = self.try_set(key, value) {
            log::warn!(
                "Could not save preference {} to {}: {e}",
                key.as_str(),
                self.path.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store() {
        let mut prefs = MemoryPreferences::new();
        assert_eq!(prefs.playback_speed(), None);

        prefs.set(PreferenceKey::PlaybackSpeed, json!(1.5));
        prefs.set(PreferenceKey::DisplayLanguage, json!("python"));
        assert_eq!(prefs.playback_speed(), Some(1.5));
        assert_eq!(prefs.display_language(), Some(DisplayLanguage::Python));
    }

    #[test]
    fn test_invalid_speed_is_ignored() {
        let mut prefs = MemoryPreferences::new();
        prefs.set(PreferenceKey::PlaybackSpeed, json!(-2.0));
        assert_eq!(prefs.playback_speed(), None);
        prefs.set(PreferenceKey::PlaybackSpeed, json!("fast"));
        assert_eq!(prefs.playback_speed(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut prefs = JsonFilePreferences::new(&path);
        assert_eq!(prefs.playback_speed(), None);

        prefs.set(PreferenceKey::PlaybackSpeed, json!(2.0));
        prefs.set(PreferenceKey::DisplayLanguage, json!("golang"));

        let reopened = JsonFilePreferences::new(&path);
        assert_eq!(reopened.playback_speed(), Some(2.0));
        assert_eq!(reopened.display_language(), Some(DisplayLanguage::Golang));
    }

    #[test]
    fn test_file_store_swallows_corruption() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let mut prefs = JsonFilePreferences::new(&path);
        assert_eq!(prefs.get(PreferenceKey::PlaybackSpeed), None);

        prefs.set(PreferenceKey::PlaybackSpeed, json!(0.5));
        assert_eq!(prefs.playback_speed(), Some(0.5));
    }

    #[test]
    fn test_file_store_swallows_unwritable_path() {
        let dir = tempdir().unwrap();
        let mut prefs = JsonFilePreferences::new(dir.path().join("missing").join("prefs.json"));
        prefs.set(PreferenceKey::PlaybackSpeed, json!(1.0));
        assert_eq!(prefs.playback_speed(), None);
    }
}
