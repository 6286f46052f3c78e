//! Purchase submission through the wallet.

use lottery_core::transaction::CallArg;
use lottery_core::{
    BuyOutcome, GameStore, LotteryConfig, SessionMonitor, SessionState, StatusChannel,
    TransactionSubmitter, WalletError, WalletState,
};
use lottery_test_helpers::{game_address, FakeWallet};
use lottery_types::{Address, Asset, CellIndex, NetworkCode, StatusKind};
use std::sync::Arc;

struct Harness {
    wallet: Arc<FakeWallet>,
    submitter: TransactionSubmitter,
    status: StatusChannel,
    config: LotteryConfig,
}

fn harness(wallet: FakeWallet) -> Harness {
    let config = LotteryConfig::default().with_game_address(game_address());
    let wallet = Arc::new(wallet);
    let store = GameStore::new();
    let status = StatusChannel::new();
    let session = Arc::new(SessionMonitor::new(
        wallet.clone(),
        status.clone(),
        store.session_writer(),
        config.expected_network,
    ));
    let submitter = TransactionSubmitter::new(wallet.clone(), session, status.clone(), &config);
    Harness {
        wallet,
        submitter,
        status,
        config,
    }
}

fn ready_wallet() -> FakeWallet {
    FakeWallet::with_state(WalletState::unlocked(
        Address::new("3PUser"),
        NetworkCode::MAINNET,
    ))
}

fn cell(index: usize) -> CellIndex {
    CellIndex::new(index).unwrap()
}

#[tokio::test]
async fn test_buy_with_native_asset() {
    let h = harness(ready_wallet());

    let outcome = h.submitter.buy(cell(42), Asset::Native).await;
    match &outcome {
        BuyOutcome::Submitted(submitted) => assert_eq!(submitted.id.as_deref(), Some("Tx1")),
        other => panic!("expected submission, got {:?}", other),
    }
    assert!(h.status.latest().is_cleared());

    let submitted = h.wallet.submitted();
    assert_eq!(submitted.len(), 1);
    let tx = &submitted[0];
    assert_eq!(tx.tx_type, 16);
    assert_eq!(tx.data.dapp, game_address());
    assert_eq!(tx.data.call.function, "buy");
    assert_eq!(tx.data.call.args, vec![CallArg::Integer(42)]);
    assert_eq!(tx.data.payment.len(), 1);
    assert_eq!(tx.data.payment[0].tokens, "1");
    assert_eq!(tx.data.payment[0].asset_id.as_str(), "WAVES");
    assert_eq!(tx.data.fee.tokens, "0.005");
}

#[tokio::test]
async fn test_buy_with_token_asset() {
    let h = harness(ready_wallet());

    assert!(h.submitter.buy(cell(3), Asset::Token).await.is_submitted());
    let tx = &h.wallet.submitted()[0];
    assert_eq!(tx.data.payment[0].asset_id, h.config.token_asset.id);
}

#[tokio::test]
async fn test_buy_is_not_idempotent() {
    let h = harness(ready_wallet());

    assert!(h.submitter.buy(cell(1), Asset::Native).await.is_submitted());
    assert!(h.submitter.buy(cell(1), Asset::Native).await.is_submitted());
    assert_eq!(h.wallet.submitted().len(), 2);
    assert_eq!(h.wallet.subscriber_count(), 1);
}

#[tokio::test]
async fn test_rejection_publishes_wallet_message() {
    let h = harness(ready_wallet());
    h.wallet.set_rejection(Some("User denied message"));

    let outcome = h.submitter.buy(cell(9), Asset::Native).await;
    assert_eq!(
        outcome,
        BuyOutcome::Failed(WalletError::Rejected("User denied message".to_string()))
    );
    assert_eq!(h.status.latest().kind, StatusKind::Error);
    assert_eq!(h.status.latest().message, "User denied message");
}

#[tokio::test]
async fn test_malformed_wallet_response() {
    let h = harness(ready_wallet());
    h.wallet.set_response("not json");

    let outcome = h.submitter.buy(cell(9), Asset::Native).await;
    assert!(matches!(
        outcome,
        BuyOutcome::Failed(WalletError::MalformedResponse(_))
    ));
    assert_eq!(h.status.latest().kind, StatusKind::Error);
}

#[tokio::test]
async fn test_locked_wallet_blocks_purchase() {
    let h = harness(FakeWallet::with_state(WalletState::locked()));

    let outcome = h.submitter.buy(cell(9), Asset::Native).await;
    assert_eq!(outcome, BuyOutcome::NotReady(Some(SessionState::Locked)));
    assert!(h.wallet.submitted().is_empty());
    assert_eq!(h.status.latest().message, "unlock wallet");
}

#[tokio::test]
async fn test_missing_extension_blocks_purchase() {
    let h = harness(FakeWallet::uninstalled());

    let outcome = h.submitter.buy(cell(0), Asset::Native).await;
    assert_eq!(outcome, BuyOutcome::NotReady(Some(SessionState::Uninstalled)));
    assert!(h.wallet.submitted().is_empty());
    assert_eq!(h.status.latest().kind, StatusKind::Error);
    assert_eq!(h.status.latest().message, "install wallet");
}

#[tokio::test]
async fn test_failed_session_check_is_retried() {
    let h = harness(ready_wallet());
    h.wallet.set_state_error(Some("access denied"));

    let outcome = h.submitter.buy(cell(9), Asset::Native).await;
    assert_eq!(outcome, BuyOutcome::NotReady(None));
    assert_eq!(h.status.latest().kind, StatusKind::Error);
    assert_eq!(h.status.latest().message, "access denied");

    h.status.clear();
    let outcome = h.submitter.buy(cell(9), Asset::Native).await;
    assert_eq!(outcome, BuyOutcome::NotReady(None));
    assert_eq!(h.status.latest().message, "access denied");
    assert_eq!(h.wallet.state_requests(), 2);

    h.wallet.set_state_error(None);
    assert!(h.submitter.buy(cell(9), Asset::Native).await.is_submitted());
    assert_eq!(h.wallet.state_requests(), 3);

    assert!(h.submitter.buy(cell(9), Asset::Native).await.is_submitted());
    assert_eq!(h.wallet.state_requests(), 3);
    assert_eq!(h.wallet.submitted().len(), 2);
}
