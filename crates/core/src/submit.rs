//! Purchase submission.

use crate::config::LotteryConfig;
use crate::session::{SessionMonitor, SessionState};
use crate::status::StatusChannel;
use crate::transaction::{InvokeTransaction, SubmittedTransaction};
use crate::wallet::{SigningCollaborator, WalletError};
use lottery_types::{Asset, CellIndex, Status};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a purchase attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum BuyOutcome {
    /// The wallet signed and broadcast the transaction.
    Submitted(SubmittedTransaction),
    /// The wallet session does not allow purchases.
    NotReady(Option<SessionState>),
    /// The wallet rejected or failed the request.
    Failed(WalletError),
}

impl BuyOutcome {
    /// Whether a transaction went out.
    pub fn is_submitted(&self) -> bool {
        matches!(self, BuyOutcome::Submitted(_))
    }
}

/// Builds purchase transactions and hands them to the wallet.
///
/// Every call that reaches the wallet submits a new transaction; nothing
/// is retried or deduplicated here.
pub struct TransactionSubmitter {
    wallet: Arc<dyn SigningCollaborator>,
    session: Arc<SessionMonitor>,
    status: StatusChannel,
    config: LotteryConfig,
}

impl TransactionSubmitter {
    /// Create a submitter for the configured game.
    pub fn new(
        wallet: Arc<dyn SigningCollaborator>,
        session: Arc<SessionMonitor>,
        status: StatusChannel,
        config: &LotteryConfig,
    ) -> Self {
        Self {
            wallet,
            session,
            status,
            config: config.clone(),
        }
    }

    /// Transaction parameters for buying `cell` with `asset`.
    pub fn build(&self, cell: CellIndex, asset: Asset) -> InvokeTransaction {
        self.config.buy_transaction(cell, asset)
    }

    /// Buy `cell`, paying one unit of `asset`.
    ///
    /// The first attempt triggers the wallet session check. Outcomes are
    /// published to the status slot: cleared on success, the wallet's
    /// message on failure, the session's status when not ready.
    pub async fn buy(&self, cell: CellIndex, asset: Asset) -> BuyOutcome {
        self.session.ensure_checked().await;

        let session = self.session.state();
        if !session.is_some_and(SessionState::can_purchase) {
            debug!(cell = %cell, session = ?session, "Purchase blocked by wallet session");
            if let Some(state) = session {
                self.status.publish(state.status());
            }
            return BuyOutcome::NotReady(session);
        }

        let tx = self.build(cell, asset);
        let result = self
            .wallet
            .sign_and_publish(&tx)
            .await
            .and_then(|json| SubmittedTransaction::parse(&json));

        match result {
            Ok(submitted) => {
                info!(cell = %cell, asset = %asset, id = ?submitted.id, "Purchase submitted");
                self.status.clear();
                BuyOutcome::Submitted(submitted)
            }
            Err(e) => {
                warn!(cell = %cell, asset = %asset, error = %e, "Purchase failed");
                self.status.publish(Status::error(e.to_string()));
                BuyOutcome::Failed(e)
            }
        }
    }
}
