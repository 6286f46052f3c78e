//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of purchasable cells on the board.
pub const CELL_COUNT: usize = 100;

/// Index of one of the [`CELL_COUNT`] cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct CellIndex(u8);

impl CellIndex {
    /// The first cell.
    pub const ZERO: Self = CellIndex(0);

    /// Create a cell index, returning `None` when outside `0..CELL_COUNT`.
    pub fn new(index: usize) -> Option<Self> {
        if index < CELL_COUNT {
            Some(CellIndex(index as u8))
        } else {
            None
        }
    }

    /// Interpret a data-store key as a cell index.
    ///
    /// Only keys that read as an integer in `0..=99` qualify; counters such
    /// as `round` or `lastWin` return `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        key.trim().parse::<usize>().ok().and_then(Self::new)
    }

    /// Get the raw index.
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every cell index in order.
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..CELL_COUNT as u8).map(CellIndex)
    }
}

impl TryFrom<u64> for CellIndex {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("cell index {} out of range", value))
    }
}

impl From<CellIndex> for u64 {
    fn from(index: CellIndex) -> Self {
        index.0 as u64
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lottery round number.
///
/// Round `0` marks a cell that was never purchased; the game itself starts
/// at round `1`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Round(pub u64);

impl Round {
    /// Sentinel for cells that have never been bought.
    pub const NEVER: Self = Round(0);

    /// Round the game starts in before any poll completes.
    pub const FIRST: Self = Round(1);

    /// Whether this is the never-purchased sentinel.
    pub fn is_never(self) -> bool {
        self == Self::NEVER
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// On-chain account address (base58 text as returned by the node).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Address(address.into())
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Address::new(s))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-character network code reported by the wallet (`W` mainnet, `T` testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkCode(pub char);

impl NetworkCode {
    /// Mainnet.
    pub const MAINNET: Self = NetworkCode('W');

    /// Testnet.
    pub const TESTNET: Self = NetworkCode('T');
}

impl Default for NetworkCode {
    fn default() -> Self {
        Self::MAINNET
    }
}

impl fmt::Display for NetworkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_from_key() {
        assert_eq!(CellIndex::from_key("0").map(CellIndex::get), Some(0));
        assert_eq!(CellIndex::from_key("99").map(CellIndex::get), Some(99));
        assert_eq!(CellIndex::from_key("100"), None);
        assert_eq!(CellIndex::from_key("-1"), None);
        assert_eq!(CellIndex::from_key("round"), None);
        assert_eq!(CellIndex::from_key("lastWin"), None);
        assert_eq!(CellIndex::from_key(""), None);
    }

    #[test]
    fn test_all_cell_indices() {
        let all: Vec<_> = CellIndex::all().collect();
        assert_eq!(all.len(), CELL_COUNT);
        assert_eq!(all[0].get(), 0);
        assert_eq!(all[99].get(), 99);
    }

    #[test]
    fn test_cell_index_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<CellIndex>("42").is_ok());
        assert!(serde_json::from_str::<CellIndex>("100").is_err());
    }
}
