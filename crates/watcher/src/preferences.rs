//! Preferences persisted as a flat TOML table.

use lottery_core::PreferenceStore;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Preferences stored in a TOML file, rewritten on every change.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePreferences {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        let contents = toml::to_string(&*values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, contents)?;
        debug!(key, value, path = %self.path.display(), "Saved preference");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottery_core::preferences::{load_asset, load_locale, ASSET_KEY, LOCALE_KEY};
    use lottery_types::{Asset, Locale};

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::open(dir.path().join("prefs.toml")).unwrap();
        assert_eq!(prefs.get(LOCALE_KEY), None);
        assert_eq!(load_locale(&prefs), Locale::En);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let prefs = FilePreferences::open(&path).unwrap();
        prefs.set(LOCALE_KEY, "ru").unwrap();
        prefs.set(ASSET_KEY, "wct").unwrap();
        drop(prefs);

        let prefs = FilePreferences::open(&path).unwrap();
        assert_eq!(load_locale(&prefs), Locale::Ru);
        assert_eq!(load_asset(&prefs), Asset::Token);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "locale = [").unwrap();

        let err = FilePreferences::open(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
