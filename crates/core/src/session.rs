//! Wallet session monitoring.
//!
//! Maps the wallet's account/network/lock state onto a small set of
//! session states, publishes the matching status, and records the user's
//! address once the session is ready.

use crate::state::SessionWriter;
use crate::status::StatusChannel;
use crate::wallet::{SigningCollaborator, WalletError, WalletState, WalletSubscription};
use lottery_types::{MessageKey, NetworkCode, Status};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Where the wallet session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No wallet extension.
    Uninstalled,
    /// Extension present, no account created.
    Uninitialized,
    /// Account exists but the wallet is locked.
    Locked,
    /// Connected to a different network than the game's.
    WrongNetwork,
    /// Able to sign purchases.
    Ready,
}

impl SessionState {
    /// Classify a wallet state update.
    ///
    /// Checks run in order: account created, unlocked, network. A wallet on
    /// the right network that reports no account counts as uninitialized.
    pub fn evaluate(state: &WalletState, expected: NetworkCode) -> Self {
        if !state.initialized {
            return SessionState::Uninitialized;
        }
        if state.locked {
            return SessionState::Locked;
        }
        match &state.network {
            Some(network) if network.code == expected => match state.account {
                Some(_) => SessionState::Ready,
                None => SessionState::Uninitialized,
            },
            _ => SessionState::WrongNetwork,
        }
    }

    /// Status shown while in this state.
    pub fn status(self) -> Status {
        match self {
            SessionState::Uninstalled => Status::error(MessageKey::InstallWallet.as_str()),
            SessionState::Uninitialized => Status::translate(MessageKey::CreateAccount),
            SessionState::Locked => Status::translate(MessageKey::UnlockWallet),
            SessionState::WrongNetwork => Status::translate(MessageKey::SwitchNetwork),
            SessionState::Ready => Status::cleared(),
        }
    }

    /// Whether purchases may be submitted.
    pub fn can_purchase(self) -> bool {
        self == SessionState::Ready
    }
}

/// Applies wallet updates to the status slot and the session fields.
#[derive(Debug, Clone)]
struct SessionObserver {
    status: StatusChannel,
    writer: SessionWriter,
    expected_network: NetworkCode,
    current: Arc<Mutex<Option<SessionState>>>,
}

impl SessionObserver {
    fn observe(&self, state: &WalletState) -> SessionState {
        let session = SessionState::evaluate(state, self.expected_network);
        self.status.publish(session.status());

        match session {
            SessionState::WrongNetwork => self.writer.set_purchase_enabled(false),
            SessionState::Ready => {
                if let Some(account) = &state.account {
                    self.writer.set_user_address(account.address.clone());
                }
                self.writer.set_purchase_enabled(true);
            }
            _ => {}
        }

        self.transition(session);
        session
    }

    fn mark_uninstalled(&self) -> SessionState {
        self.status.publish(SessionState::Uninstalled.status());
        self.transition(SessionState::Uninstalled);
        SessionState::Uninstalled
    }

    fn report(&self, error: &WalletError) {
        warn!(error = %error, "Wallet request failed");
        self.status.publish(Status::error(error.to_string()));
    }

    fn transition(&self, session: SessionState) {
        let previous = self.current.lock().replace(session);
        if previous != Some(session) {
            info!(from = ?previous, to = ?session, "Wallet session changed");
        }
    }

    async fn follow(&self, mut subscription: WalletSubscription, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                update = subscription.next() => match update {
                    Some(state) => {
                        self.observe(&state);
                    }
                    None => {
                        debug!("Wallet update stream closed");
                        break;
                    }
                },
            }
        }
        subscription.unsubscribe();
    }
}

struct Listener {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Watches the wallet session and keeps status and session fields current.
pub struct SessionMonitor {
    wallet: Arc<dyn SigningCollaborator>,
    observer: SessionObserver,
    checked: OnceCell<()>,
    listener: Mutex<Option<Listener>>,
}

impl SessionMonitor {
    /// Create a monitor. Nothing is checked until [`check`](Self::check) or
    /// [`ensure_checked`](Self::ensure_checked) runs.
    pub fn new(
        wallet: Arc<dyn SigningCollaborator>,
        status: StatusChannel,
        writer: SessionWriter,
        expected_network: NetworkCode,
    ) -> Self {
        Self {
            wallet,
            observer: SessionObserver {
                status,
                writer,
                expected_network,
                current: Arc::new(Mutex::new(None)),
            },
            checked: OnceCell::new(),
            listener: Mutex::new(None),
        }
    }

    /// Current session state; `None` before the first check.
    pub fn state(&self) -> Option<SessionState> {
        *self.observer.current.lock()
    }

    /// Whether purchases may be submitted.
    pub fn is_ready(&self) -> bool {
        self.state().is_some_and(SessionState::can_purchase)
    }

    /// Apply one wallet state update.
    pub fn observe(&self, state: &WalletState) -> SessionState {
        self.observer.observe(state)
    }

    /// Query the wallet and start following its updates.
    ///
    /// Failures are published to the status slot as well as returned.
    pub async fn check(&self) -> Result<SessionState, WalletError> {
        if !self.wallet.is_installed() {
            return Ok(self.observer.mark_uninstalled());
        }

        if let Err(e) = self.wallet.ready().await {
            self.observer.report(&e);
            return Err(e);
        }

        self.listen(self.wallet.subscribe());

        match self.wallet.public_state().await {
            Ok(state) => Ok(self.observer.observe(&state)),
            Err(e) => {
                self.observer.report(&e);
                Err(e)
            }
        }
    }

    /// Run [`check`](Self::check) until it succeeds once; later calls
    /// return immediately. A failed check is retried on the next call.
    pub async fn ensure_checked(&self) {
        let _ = self
            .checked
            .get_or_try_init(|| async { self.check().await.map(|_| ()) })
            .await;
    }

    /// Stop following wallet updates.
    pub async fn stop(&self) {
        let listener = self.listener.lock().take();
        if let Some(listener) = listener {
            listener.token.cancel();
            let _ = listener.handle.await;
        }
    }

    fn listen(&self, subscription: WalletSubscription) {
        let token = CancellationToken::new();
        let observer = self.observer.clone();
        let child = token.clone();
        let handle = tokio::spawn(async move { observer.follow(subscription, child).await });

        if let Some(previous) = self.listener.lock().replace(Listener { token, handle }) {
            previous.token.cancel();
        }
    }
}

impl Drop for SessionMonitor {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.get_mut().take() {
            listener.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::WalletNetwork;
    use lottery_types::Address;

    const W: NetworkCode = NetworkCode::MAINNET;

    #[test]
    fn test_evaluate_order() {
        assert_eq!(
            SessionState::evaluate(&WalletState::uninitialized(), W),
            SessionState::Uninitialized
        );
        assert_eq!(
            SessionState::evaluate(&WalletState::locked(), W),
            SessionState::Locked
        );
        assert_eq!(
            SessionState::evaluate(
                &WalletState::unlocked(Address::new("X"), NetworkCode::TESTNET),
                W
            ),
            SessionState::WrongNetwork
        );
        assert_eq!(
            SessionState::evaluate(&WalletState::unlocked(Address::new("X"), W), W),
            SessionState::Ready
        );
    }

    #[test]
    fn test_missing_network_is_wrong_network() {
        let mut state = WalletState::unlocked(Address::new("X"), W);
        state.network = None;
        assert_eq!(SessionState::evaluate(&state, W), SessionState::WrongNetwork);
    }

    #[test]
    fn test_wrong_network_without_account() {
        let state = WalletState {
            initialized: true,
            locked: false,
            account: None,
            network: Some(WalletNetwork {
                code: NetworkCode::TESTNET,
            }),
        };
        assert_eq!(SessionState::evaluate(&state, W), SessionState::WrongNetwork);
    }

    #[test]
    fn test_only_ready_can_purchase() {
        assert!(SessionState::Ready.can_purchase());
        assert!(!SessionState::WrongNetwork.can_purchase());
        assert!(!SessionState::Locked.can_purchase());
        assert!(SessionState::Ready.status().is_cleared());
    }
}
