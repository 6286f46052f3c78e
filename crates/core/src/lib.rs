//! Game state, reconciliation and wallet session for the lottery client.
//!
//! # Components
//!
//! - [`GameStore`]: owns the session's [`GameState`]; writers are split by
//!   owner ([`LedgerWriter`], [`SessionWriter`])
//! - [`StatusChannel`]: last-write-wins status slot
//! - [`ReconciliationEngine`]: periodic pull of the game account's storage
//! - [`SessionMonitor`]: wallet account/network/lock tracking
//! - [`TransactionSubmitter`]: purchase transactions through the wallet
//! - [`GameClient`]: all of the above for one session
//!
//! External collaborators are reached through traits: the node's query API
//! ([`lottery_client::QueryApi`]), the wallet ([`SigningCollaborator`]) and
//! preference storage ([`PreferenceStore`]).

pub mod config;
pub mod game;
pub mod preferences;
pub mod reconcile;
pub mod session;
pub mod state;
pub mod status;
pub mod submit;
pub mod transaction;
pub mod wallet;

pub use config::{AssetConfig, ConfigError, FeeConfig, LotteryConfig, MIN_POLL_INTERVAL};
pub use game::GameClient;
pub use preferences::{MemoryPreferences, PreferenceStore};
pub use reconcile::{EngineConfig, PassError, PassOutcome, PassReport, ReconciliationEngine};
pub use session::{SessionMonitor, SessionState};
pub use state::{CellMerge, GameState, GameStore, LedgerWriter, RejectedCell, SessionWriter};
pub use status::StatusChannel;
pub use submit::{BuyOutcome, TransactionSubmitter};
pub use transaction::{InvokeTransaction, SubmittedTransaction};
pub use wallet::{NoWallet, SigningCollaborator, WalletError, WalletState, WalletSubscription};
