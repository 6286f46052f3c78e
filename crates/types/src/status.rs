//! User-visible status line.

use crate::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Nothing to report.
    #[default]
    None,
    /// Raw error text.
    Error,
    /// A [`MessageKey`] to be resolved in the active locale.
    Translate,
}

/// Keys of the localized message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    InstallWallet,
    CreateAccount,
    UnlockWallet,
    SwitchNetwork,
    FirstRound,
    Round,
    Balance,
    LastWin,
    GameAddress,
}

impl MessageKey {
    /// Every key, for catalog completeness checks.
    pub const ALL: [MessageKey; 9] = [
        MessageKey::InstallWallet,
        MessageKey::CreateAccount,
        MessageKey::UnlockWallet,
        MessageKey::SwitchNetwork,
        MessageKey::FirstRound,
        MessageKey::Round,
        MessageKey::Balance,
        MessageKey::LastWin,
        MessageKey::GameAddress,
    ];

    /// Key text carried in a [`Status`] message.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::InstallWallet => "install wallet",
            MessageKey::CreateAccount => "create account",
            MessageKey::UnlockWallet => "unlock wallet",
            MessageKey::SwitchNetwork => "switch network",
            MessageKey::FirstRound => "first round",
            MessageKey::Round => "round",
            MessageKey::Balance => "balance",
            MessageKey::LastWin => "last win",
            MessageKey::GameAddress => "game address",
        }
    }
}

impl FromStr for MessageKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|key| key.as_str() == s).ok_or(())
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest condition worth showing to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    /// Nothing to report.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Raw error text.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    /// A catalog key to be resolved in the active locale.
    pub fn translate(key: MessageKey) -> Self {
        Self {
            kind: StatusKind::Translate,
            message: key.as_str().to_string(),
        }
    }

    /// Whether there is nothing to report.
    pub fn is_cleared(&self) -> bool {
        self.kind == StatusKind::None && self.message.is_empty()
    }

    /// Text to show in `locale`.
    ///
    /// Messages that name a catalog key are resolved whatever their kind;
    /// other messages pass through unchanged.
    pub fn render(&self, locale: Locale) -> String {
        match self.message.parse::<MessageKey>() {
            Ok(key) => locale.text(key).to_string(),
            Err(()) => self.message.clone(),
        }
    }
}
