//! Boundary to persistent user preferences.

use lottery_types::{Asset, Locale};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::warn;

/// Preference key of the interface language.
pub const LOCALE_KEY: &str = "locale";

/// Preference key of the payment asset.
pub const ASSET_KEY: &str = "asset";

/// Key/value storage that outlives the session.
pub trait PreferenceStore: Send + Sync {
    /// Read a stored value.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value.
    fn set(&self, key: &str, value: &str) -> std::io::Result<()>;
}

/// Stored locale, or the default if unset or unrecognized.
pub fn load_locale(store: &dyn PreferenceStore) -> Locale {
    load_parsed(store, LOCALE_KEY)
}

/// Stored asset, or the default if unset or unrecognized.
pub fn load_asset(store: &dyn PreferenceStore) -> Asset {
    load_parsed(store, ASSET_KEY)
}

fn load_parsed<T>(store: &dyn PreferenceStore, key: &str) -> T
where
    T: std::str::FromStr + Default,
{
    match store.get(key) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!(key, value = %value, "Ignoring unrecognized preference");
            T::default()
        }),
        None => T::default(),
    }
}

/// Preferences kept in memory for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferences {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults_when_unset_or_invalid() {
        let store = MemoryPreferences::new();
        assert_eq!(load_locale(&store), Locale::En);
        assert_eq!(load_asset(&store), Asset::Native);

        store.set(LOCALE_KEY, "klingon").unwrap();
        assert_eq!(load_locale(&store), Locale::En);
    }

    #[test]
    fn test_load_stored_values() {
        let store = MemoryPreferences::new();
        store.set(LOCALE_KEY, "ru").unwrap();
        store.set(ASSET_KEY, "wct").unwrap();
        assert_eq!(load_locale(&store), Locale::Ru);
        assert_eq!(load_asset(&store), Asset::Token);
    }
}
