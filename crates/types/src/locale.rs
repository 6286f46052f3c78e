//! Message catalog for the supported languages.

use crate::MessageKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// Every supported locale.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ru];

    /// Language tag stored in preferences.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    /// Resolve a catalog key.
    pub fn text(self, key: MessageKey) -> &'static str {
        match self {
            Locale::En => match key {
                MessageKey::InstallWallet => "Install WavesKeeper and restart page",
                MessageKey::CreateAccount => "Create waves account",
                MessageKey::UnlockWallet => "Unlock keeper",
                MessageKey::SwitchNetwork => "Change network to MAINNET",
                MessageKey::FirstRound => "none (first round)",
                MessageKey::Round => "Round",
                MessageKey::Balance => "Balance",
                MessageKey::LastWin => "Last win",
                MessageKey::GameAddress => "Game address",
            },
            Locale::Ru => match key {
                MessageKey::InstallWallet => "Установите WavesKeeper и обновите страницу",
                MessageKey::CreateAccount => "Создайте waves аккаунт",
                MessageKey::UnlockWallet => "Разблокируйте keeper",
                MessageKey::SwitchNetwork => "Смените сеть на MAINNET",
                MessageKey::FirstRound => "нет (первый раунд)",
                MessageKey::Round => "Раунд",
                MessageKey::Balance => "Баланс",
                MessageKey::LastWin => "Последний победитель",
                MessageKey::GameAddress => "Адрес игры",
            },
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unsupported locale: {}", s))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("ru".parse::<Locale>(), Ok(Locale::Ru));
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_catalog_is_complete() {
        for locale in Locale::ALL {
            for key in MessageKey::ALL {
                assert!(!locale.text(key).is_empty(), "{locale} missing {key}");
            }
        }
    }
}
