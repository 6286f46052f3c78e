//! Codec for the `field_field` values the game contract stores.
//!
//! Cell entries hold `owner_round` and the `lastWin` entry holds
//! `cellIndex_address`. Both are exactly two non-empty fields joined by a
//! single [`DELIMITER`]; anything else is a [`MalformedEntry`].

use crate::{Address, CellIndex, CellValue, LastWinner, Round};
use thiserror::Error;

/// Field separator used by the contract.
pub const DELIMITER: char = '_';

/// A stored value that does not follow the two-field format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEntry {
    /// No delimiter at all.
    #[error("missing '_' delimiter in {raw:?}")]
    MissingDelimiter { raw: String },

    /// More than one delimiter.
    #[error("more than one '_' delimiter in {raw:?}")]
    ExtraDelimiter { raw: String },

    /// One of the two fields is empty.
    #[error("empty field in {raw:?}")]
    EmptyField { raw: String },

    /// A numeric field does not parse or is out of range.
    #[error("invalid {field} in {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },
}

impl MalformedEntry {
    /// The raw value that failed to decode.
    pub fn raw(&self) -> &str {
        match self {
            MalformedEntry::MissingDelimiter { raw }
            | MalformedEntry::ExtraDelimiter { raw }
            | MalformedEntry::EmptyField { raw }
            | MalformedEntry::InvalidNumber { raw, .. } => raw,
        }
    }
}

/// Split a raw value into its two fields.
fn split_pair(raw: &str) -> Result<(&str, &str), MalformedEntry> {
    let mut parts = raw.split(DELIMITER);
    let first = parts.next().unwrap_or_default();
    let Some(second) = parts.next() else {
        return Err(MalformedEntry::MissingDelimiter {
            raw: raw.to_string(),
        });
    };
    if parts.next().is_some() {
        return Err(MalformedEntry::ExtraDelimiter {
            raw: raw.to_string(),
        });
    }
    if first.is_empty() || second.is_empty() {
        return Err(MalformedEntry::EmptyField {
            raw: raw.to_string(),
        });
    }
    Ok((first, second))
}

/// Decode a cell entry `owner_round`.
pub fn decode_cell_value(raw: &str) -> Result<CellValue, MalformedEntry> {
    let (owner, round) = split_pair(raw)?;
    let round = round
        .parse::<u64>()
        .map_err(|_| MalformedEntry::InvalidNumber {
            field: "round",
            raw: raw.to_string(),
        })?;
    Ok(CellValue {
        owner: Address::new(owner),
        round: Round(round),
    })
}

/// Encode a cell entry as the contract stores it.
pub fn encode_cell_value(value: &CellValue) -> String {
    format!("{}{}{}", value.owner, DELIMITER, value.round)
}

/// Decode the `lastWin` entry `cellIndex_address`.
///
/// The address literal `none` maps to a winner without an address.
pub fn decode_last_winner(raw: &str) -> Result<LastWinner, MalformedEntry> {
    let (cell, address) = split_pair(raw)?;
    let cell = cell
        .parse::<usize>()
        .ok()
        .and_then(CellIndex::new)
        .ok_or_else(|| MalformedEntry::InvalidNumber {
            field: "cell index",
            raw: raw.to_string(),
        })?;
    let address = (address != LastWinner::NONE_ADDRESS).then(|| Address::new(address));
    Ok(LastWinner { cell, address })
}

/// Encode a last-winner record as the contract stores it.
pub fn encode_last_winner(winner: &LastWinner) -> String {
    let address = winner
        .address
        .as_ref()
        .map(Address::as_str)
        .unwrap_or(LastWinner::NONE_ADDRESS);
    format!("{}{}{}", winner.cell, DELIMITER, address)
}

/// Encoding of [`LastWinner::none`].
pub fn encode_none() -> String {
    encode_last_winner(&LastWinner::none())
}
