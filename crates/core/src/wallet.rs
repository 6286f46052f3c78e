//! Boundary to the signing collaborator (the wallet extension).
//!
//! The wallet holds the keys; this crate only asks it for account state
//! and for signing-and-broadcasting prepared transactions.

use crate::session::SessionState;
use crate::transaction::InvokeTransaction;
use async_trait::async_trait;
use lottery_types::{Address, NetworkCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors surfaced by the wallet boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No wallet extension is present.
    #[error("wallet extension is not installed")]
    Unavailable,

    /// The wallet session cannot sign right now.
    #[error("wallet session is not ready: {0:?}")]
    NotReady(Option<SessionState>),

    /// The wallet refused or failed the request; carries its message.
    #[error("{0}")]
    Rejected(String),

    /// The wallet answered with something that is not a transaction.
    #[error("malformed wallet response: {0}")]
    MalformedResponse(String),
}

/// Account part of a wallet state update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub address: Address,
}

/// Network part of a wallet state update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletNetwork {
    pub code: NetworkCode,
}

/// Account, network and lock state reported by the wallet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletState {
    pub initialized: bool,
    pub locked: bool,
    pub account: Option<WalletAccount>,
    pub network: Option<WalletNetwork>,
}

impl WalletState {
    /// A wallet with no account yet.
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// An initialized but locked wallet.
    pub fn locked() -> Self {
        Self {
            initialized: true,
            locked: true,
            ..Self::default()
        }
    }

    /// An unlocked wallet with an account on `network`.
    pub fn unlocked(address: Address, network: NetworkCode) -> Self {
        Self {
            initialized: true,
            locked: false,
            account: Some(WalletAccount { address }),
            network: Some(WalletNetwork { code: network }),
        }
    }
}

/// Stream of wallet state updates.
///
/// Dropping the subscription, or calling [`unsubscribe`](Self::unsubscribe),
/// closes it; the wallet side sees a closed channel and stops pushing.
#[derive(Debug)]
pub struct WalletSubscription {
    rx: mpsc::UnboundedReceiver<WalletState>,
}

impl WalletSubscription {
    /// Create a subscription and the sender the wallet pushes into.
    pub fn channel() -> (mpsc::UnboundedSender<WalletState>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Wait for the next update. `None` once the wallet stops pushing.
    pub async fn next(&mut self) -> Option<WalletState> {
        self.rx.recv().await
    }

    /// Stop receiving updates.
    pub fn unsubscribe(mut self) {
        self.rx.close();
    }
}

/// The wallet extension.
#[async_trait]
pub trait SigningCollaborator: Send + Sync {
    /// Whether the extension is present at all.
    fn is_installed(&self) -> bool;

    /// Resolve once the extension has finished starting up.
    async fn ready(&self) -> Result<(), WalletError>;

    /// Subscribe to account/network/lock updates.
    fn subscribe(&self) -> WalletSubscription;

    /// Current account/network/lock state.
    async fn public_state(&self) -> Result<WalletState, WalletError>;

    /// Sign and broadcast a transaction, returning the signed transaction JSON.
    async fn sign_and_publish(&self, tx: &InvokeTransaction) -> Result<String, WalletError>;
}

/// Stand-in for hosts without a wallet extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWallet;

#[async_trait]
impl SigningCollaborator for NoWallet {
    fn is_installed(&self) -> bool {
        false
    }

    async fn ready(&self) -> Result<(), WalletError> {
        Err(WalletError::Unavailable)
    }

    fn subscribe(&self) -> WalletSubscription {
        let (_tx, subscription) = WalletSubscription::channel();
        subscription
    }

    async fn public_state(&self) -> Result<WalletState, WalletError> {
        Err(WalletError::Unavailable)
    }

    async fn sign_and_publish(&self, _tx: &InvokeTransaction) -> Result<String, WalletError> {
        Err(WalletError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_payload() {
        let state: WalletState = serde_json::from_str(
            r#"{"initialized":true,"locked":false,"account":{"address":"3PUser"},"network":{"code":"W"}}"#,
        )
        .unwrap();
        assert_eq!(
            state,
            WalletState::unlocked(Address::new("3PUser"), NetworkCode::MAINNET)
        );

        let state: WalletState = serde_json::from_str(r#"{"initialized":false}"#).unwrap();
        assert_eq!(state, WalletState::uninitialized());
    }

    #[tokio::test]
    async fn test_subscription_closes_for_sender() {
        let (tx, mut subscription) = WalletSubscription::channel();
        tx.send(WalletState::locked()).unwrap();
        assert_eq!(subscription.next().await, Some(WalletState::locked()));

        subscription.unsubscribe();
        assert!(tx.is_closed());
        assert!(tx.send(WalletState::locked()).is_err());
    }
}
