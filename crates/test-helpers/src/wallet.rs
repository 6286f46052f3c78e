use async_trait::async_trait;
use lottery_core::{
    InvokeTransaction, SigningCollaborator, WalletError, WalletState, WalletSubscription,
};
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Default)]
struct Inner {
    state: WalletState,
    subscribers: Vec<UnboundedSender<WalletState>>,
    submitted: Vec<InvokeTransaction>,
    rejection: Option<String>,
    response: Option<String>,
    state_error: Option<String>,
    state_requests: usize,
}

/// Scripted wallet extension.
#[derive(Debug)]
pub struct FakeWallet {
    installed: bool,
    inner: Mutex<Inner>,
}

impl FakeWallet {
    /// An installed wallet reporting `state`.
    pub fn with_state(state: WalletState) -> Self {
        Self {
            installed: true,
            inner: Mutex::new(Inner {
                state,
                ..Inner::default()
            }),
        }
    }

    /// No extension present.
    pub fn uninstalled() -> Self {
        Self {
            installed: false,
            inner: Mutex::default(),
        }
    }

    /// Change the state and push it to live subscribers.
    pub fn push(&self, state: WalletState) {
        let mut inner = self.inner.lock();
        inner.state = state.clone();
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(state.clone()).is_ok());
    }

    /// Number of subscribers still listening.
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.subscribers.retain(|subscriber| !subscriber.is_closed());
        inner.subscribers.len()
    }

    /// Reject signing requests with `message` until cleared with `None`.
    pub fn set_rejection(&self, message: Option<&str>) {
        self.inner.lock().rejection = message.map(str::to_string);
    }

    /// Reject state queries with `message` until cleared with `None`.
    pub fn set_state_error(&self, message: Option<&str>) {
        self.inner.lock().state_error = message.map(str::to_string);
    }

    /// Number of state queries answered or rejected so far.
    pub fn state_requests(&self) -> usize {
        self.inner.lock().state_requests
    }

    /// Answer signing requests with this JSON instead of the default.
    pub fn set_response(&self, json: &str) {
        self.inner.lock().response = Some(json.to_string());
    }

    /// Transactions the wallet was asked to sign, including rejected ones.
    pub fn submitted(&self) -> Vec<InvokeTransaction> {
        self.inner.lock().submitted.clone()
    }
}

#[async_trait]
impl SigningCollaborator for FakeWallet {
    fn is_installed(&self) -> bool {
        self.installed
    }

    async fn ready(&self) -> Result<(), WalletError> {
        if self.installed {
            Ok(())
        } else {
            Err(WalletError::Unavailable)
        }
    }

    fn subscribe(&self) -> WalletSubscription {
        let (tx, subscription) = WalletSubscription::channel();
        self.inner.lock().subscribers.push(tx);
        subscription
    }

    async fn public_state(&self) -> Result<WalletState, WalletError> {
        let mut inner = self.inner.lock();
        inner.state_requests += 1;
        match &inner.state_error {
            Some(message) => Err(WalletError::Rejected(message.clone())),
            None => Ok(inner.state.clone()),
        }
    }

    async fn sign_and_publish(&self, tx: &InvokeTransaction) -> Result<String, WalletError> {
        let mut inner = self.inner.lock();
        inner.submitted.push(tx.clone());
        if let Some(message) = &inner.rejection {
            return Err(WalletError::Rejected(message.clone()));
        }
        let default = format!(r#"{{"id":"Tx{}","type":16}}"#, inner.submitted.len());
        Ok(inner.response.clone().unwrap_or(default))
    }
}
