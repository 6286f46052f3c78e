//! Core types for the lottery client.
//!
//! This crate provides the fundamental types shared by the rest of the
//! workspace:
//!
//! - **Identifiers**: [`CellIndex`], [`Round`], [`Address`], [`NetworkCode`]
//! - **Board**: [`Cell`], [`CellValue`], [`LastWinner`]
//! - **Assets**: [`Asset`], [`AssetId`], [`Amount`], [`Balances`]
//! - **Status**: [`Status`], [`StatusKind`], [`MessageKey`], [`Locale`]
//! - **Codec**: the `field_field` value format in [`codec`]

mod asset;
mod cell;
pub mod codec;
mod identifiers;
mod locale;
mod status;

pub use asset::{Amount, Asset, AssetId, Balances};
pub use cell::{Cell, CellValue, LastWinner};
pub use codec::MalformedEntry;
pub use identifiers::{Address, CellIndex, NetworkCode, Round, CELL_COUNT};
pub use locale::Locale;
pub use status::{MessageKey, Status, StatusKind};
