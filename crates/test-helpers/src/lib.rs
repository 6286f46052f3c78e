//! Test fixtures for the lottery client.
//!
//! - [`FakeQueryApi`]: in-memory game account storage with injectable
//!   failures and latency
//! - [`FakeWallet`]: scripted wallet that records what it was asked to sign

mod query;
mod wallet;

pub use query::{FailPoint, FakeQueryApi};
pub use wallet::FakeWallet;

use lottery_types::Address;

/// Game account used by the fixtures.
pub fn game_address() -> Address {
    Address::new("3PGameAccount")
}
