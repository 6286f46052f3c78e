//! Board rendering against a live game client.

use lottery_core::{GameClient, LotteryConfig, NoWallet};
use lottery_test_helpers::{game_address, FakeQueryApi};
use lottery_types::Locale;
use lottery_watcher::{render_board, FilePreferences};
use std::sync::Arc;

#[tokio::test]
async fn test_polled_board_uses_stored_locale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.toml");
    std::fs::write(&path, "locale = \"ru\"\nasset = \"wct\"\n").unwrap();

    let api = Arc::new(FakeQueryApi::new());
    api.set_round(4);
    api.set_last_win("17_3PWinner");
    api.set_cell(42, "3PBuyer_4");
    api.set_balances(250_000_000, 500);

    let client = GameClient::new(
        LotteryConfig::default().with_game_address(game_address()),
        api,
        Arc::new(NoWallet),
        Arc::new(FilePreferences::open(&path).unwrap()),
    );
    assert!(client.poll_once().await.report().is_some());

    let board = render_board(
        &client.snapshot(),
        &client.status(),
        client.locale(),
        client.config(),
    );
    assert_eq!(client.locale(), Locale::Ru);
    assert!(board.contains("Раунд: 4"));
    assert!(board.contains("#17 3PWinner"));
    assert!(board.contains("Баланс: 2.5 WAVES | 5 WCT*"));
    assert!(board.contains("[42]"));
}
