//! Payment assets and balance amounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset a user can pay with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    /// The chain's native coin.
    #[default]
    #[serde(rename = "waves")]
    Native,
    /// The community token.
    #[serde(rename = "wct")]
    Token,
}

impl Asset {
    /// Preference key for this asset.
    pub fn key(self) -> &'static str {
        match self {
            Asset::Native => "waves",
            Asset::Token => "wct",
        }
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waves" | "native" => Ok(Asset::Native),
            "wct" | "token" => Ok(Asset::Token),
            _ => Err(format!("Unknown asset: {}", s)),
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// On-chain asset identifier (`WAVES` for the native coin, base58 otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Well-known identifier of the native coin.
    pub const NATIVE: &'static str = "WAVES";

    /// Wrap an asset identifier.
    pub fn new(id: impl Into<String>) -> Self {
        AssetId(id.into())
    }

    /// The native coin's identifier.
    pub fn native() -> Self {
        AssetId::new(Self::NATIVE)
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A balance in minor units together with its decimal scale.
///
/// Displays as `minor / 10^decimals` without going through floating point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Raw balance as reported by the node.
    pub minor: u64,
    /// Number of decimal places of the asset.
    pub decimals: u32,
}

impl Amount {
    /// Create an amount from minor units.
    pub fn new(minor: u64, decimals: u32) -> Self {
        Self { minor, decimals }
    }

    /// Whole units (integer part).
    pub fn whole(&self) -> u64 {
        self.minor / self.scale()
    }

    /// Fractional part in minor units.
    pub fn fraction(&self) -> u64 {
        self.minor % self.scale()
    }

    fn scale(&self) -> u64 {
        10u64.saturating_pow(self.decimals)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fraction = self.fraction();
        if self.decimals == 0 || fraction == 0 {
            return write!(f, "{}", self.whole());
        }
        let digits = format!("{:0width$}", fraction, width = self.decimals as usize);
        write!(f, "{}.{}", self.whole(), digits.trim_end_matches('0'))
    }
}

/// Balances of the game account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    /// Native coin balance.
    pub native: Amount,
    /// Token balance.
    pub token: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_display_scales_minor_units() {
        assert_eq!(Amount::new(150_000_000, 8).to_string(), "1.5");
        assert_eq!(Amount::new(100_000_000, 8).to_string(), "1");
        assert_eq!(Amount::new(1, 8).to_string(), "0.00000001");
        assert_eq!(Amount::new(1234, 2).to_string(), "12.34");
        assert_eq!(Amount::new(0, 2).to_string(), "0");
        assert_eq!(Amount::new(7, 0).to_string(), "7");
    }

    #[test]
    fn test_asset_parse() {
        assert_eq!("waves".parse::<Asset>().unwrap(), Asset::Native);
        assert_eq!("WCT".parse::<Asset>().unwrap(), Asset::Token);
        assert!("btc".parse::<Asset>().is_err());
    }

    #[test]
    fn test_asset_serde_uses_preference_keys() {
        assert_eq!(serde_json::to_string(&Asset::Token).unwrap(), "\"wct\"");
        assert_eq!(
            serde_json::from_str::<Asset>("\"waves\"").unwrap(),
            Asset::Native
        );
    }
}
