//! User settings persisted in the `settings` preference namespace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::errors::Result;
use crate::storage::KeyValueStore;

pub const SETTINGS_NAMESPACE: &str = "settings";
pub const LANGUAGE_KEY: &str = "language";
pub const CURRENCY_KEY: &str = "currency";

/// Interface languages offered in the settings menu.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Uk,
    En,
    Ru,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Uk, Language::En, Language::Ru];

    pub fn code(self) -> &'static str {
        match self {
            Language::Uk => "UK",
            Language::En => "EN",
            Language::Ru => "RU",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|language| language.code().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unsupported language `{}`", value))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Settings {
    pub language: Language,
    pub currency: Currency,
}

/// Loads and saves [`Settings`] through a key-value namespace.
pub struct SettingsManager {
    store: Box<dyn KeyValueStore>,
}

impl SettingsManager {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Missing or unrecognised values fall back to their defaults.
    pub fn load(&self) -> Result<Settings> {
        let language = self
            .store
            .get(LANGUAGE_KEY)?
            .and_then(|raw| parse_or_warn::<Language>(LANGUAGE_KEY, &raw))
            .unwrap_or_default();
        let currency = self
            .store
            .get(CURRENCY_KEY)?
            .and_then(|raw| parse_or_warn::<Currency>(CURRENCY_KEY, &raw))
            .unwrap_or_default();
        Ok(Settings { language, currency })
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        self.store.put(LANGUAGE_KEY, settings.language.code())?;
        self.store.put(CURRENCY_KEY, settings.currency.code())?;
        tracing::debug!(
            language = %settings.language,
            currency = %settings.currency,
            "settings saved"
        );
        Ok(())
    }

    /// Forgets both stored values so the defaults apply again.
    pub fn reset(&self) -> Result<Settings> {
        self.store.remove(LANGUAGE_KEY)?;
        self.store.remove(CURRENCY_KEY)?;
        tracing::debug!("settings reset to defaults");
        Ok(Settings::default())
    }
}

fn parse_or_warn<T: FromStr<Err = String>>(key: &str, raw: &str) -> Option<T> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring stored setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn defaults_apply_to_empty_namespace() {
        let manager = SettingsManager::new(MemoryStore::new());
        let settings = manager.load().unwrap();
        assert_eq!(settings.language, Language::Uk);
        assert_eq!(settings.currency, Currency::Uah);
    }

    #[test]
    fn saved_settings_round_trip_as_plain_codes() {
        let store = Arc::new(MemoryStore::new());
        let manager = SettingsManager::new(store.clone());
        let settings = Settings {
            language: Language::En,
            currency: Currency::Usd,
        };
        manager.save(&settings).unwrap();
        assert_eq!(store.get(CURRENCY_KEY).unwrap().as_deref(), Some("USD"));
        assert_eq!(manager.load().unwrap(), settings);
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.put(LANGUAGE_KEY, "DE").unwrap();
        store.put(CURRENCY_KEY, "EUR").unwrap();
        let settings = SettingsManager::new(store).load().unwrap();
        assert_eq!(settings.language, Language::Uk);
        assert_eq!(settings.currency, Currency::Eur);
    }

    #[test]
    fn reset_removes_stored_values() {
        let store = Arc::new(MemoryStore::new());
        let manager = SettingsManager::new(store.clone());
        manager
            .save(&Settings {
                language: Language::Ru,
                currency: Currency::Eur,
            })
            .unwrap();
        assert_eq!(manager.reset().unwrap(), Settings::default());
        assert_eq!(store.get(LANGUAGE_KEY).unwrap(), None);
        assert!(store.is_empty());
        assert_eq!(manager.load().unwrap(), Settings::default());
    }
}
