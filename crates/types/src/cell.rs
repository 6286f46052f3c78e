//! Board cells and the last-winner record.

use crate::{Address, CellIndex, Round};
use serde::{Deserialize, Serialize};

/// One purchasable slot of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Position on the board; never changes.
    pub index: CellIndex,
    /// Buyer of the cell, if any.
    pub owner: Option<Address>,
    /// Round in which the cell was bought ([`Round::NEVER`] if never).
    pub round: Round,
}

impl Cell {
    /// An unpurchased cell.
    pub fn empty(index: CellIndex) -> Self {
        Self {
            index,
            owner: None,
            round: Round::NEVER,
        }
    }

    /// Whether the cell was bought during `round`.
    pub fn is_taken_in(&self, round: Round) -> bool {
        self.owner.is_some() && self.round == round
    }
}

/// Decoded value of a cell entry: `owner_round`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellValue {
    pub owner: Address,
    pub round: Round,
}

impl CellValue {
    /// Place the value at a board position.
    pub fn into_cell(self, index: CellIndex) -> Cell {
        Cell {
            index,
            owner: Some(self.owner),
            round: self.round,
        }
    }
}

/// Winner of the previous round: `cellIndex_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastWinner {
    /// Winning cell.
    pub cell: CellIndex,
    /// Winning address; `None` before the first round completes.
    pub address: Option<Address>,
}

impl LastWinner {
    /// Literal used by the game contract before any round has been won.
    pub const NONE_ADDRESS: &'static str = "none";

    /// Placeholder shown until the first poll, and stored on-chain before
    /// the first round completes.
    pub fn none() -> Self {
        Self {
            cell: CellIndex::ZERO,
            address: None,
        }
    }

    /// Whether no round has been won yet.
    pub fn is_none(&self) -> bool {
        self.address.is_none()
    }
}

impl Default for LastWinner {
    fn default() -> Self {
        Self::none()
    }
}
