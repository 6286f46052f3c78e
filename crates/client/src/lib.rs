//! Read-only client for the node's query API.
//!
//! [`RemoteStoreClient`] fetches the game account's data entries and
//! balances over HTTPS. Consumers depend on the [`QueryApi`] trait so that
//! tests can substitute an in-memory store.

pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use config::ClientConfig;
pub use error::NetworkError;
pub use store::{QueryApi, RemoteStoreClient};
pub use types::{BalanceResponse, DataEntry, EntryValue};
