//! Game client: wires the state container, reconciliation, wallet session
//! and purchase flow together.

use crate::config::LotteryConfig;
use crate::preferences::{self, PreferenceStore, ASSET_KEY, LOCALE_KEY};
use crate::reconcile::{EngineConfig, PassOutcome, ReconciliationEngine};
use crate::session::SessionMonitor;
use crate::state::{GameState, GameStore};
use crate::status::StatusChannel;
use crate::submit::{BuyOutcome, TransactionSubmitter};
use crate::wallet::SigningCollaborator;
use lottery_client::{NetworkError, QueryApi, RemoteStoreClient};
use lottery_types::{Asset, CellIndex, Locale, Status};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

/// One game session.
pub struct GameClient {
    config: LotteryConfig,
    store: GameStore,
    status: StatusChannel,
    engine: Arc<ReconciliationEngine>,
    session: Arc<SessionMonitor>,
    submitter: TransactionSubmitter,
    preferences: Arc<dyn PreferenceStore>,
    locale: RwLock<Locale>,
}

impl GameClient {
    /// Create a session against the given query API and wallet.
    ///
    /// Stored locale and asset preferences are applied immediately.
    pub fn new(
        config: LotteryConfig,
        api: Arc<dyn QueryApi>,
        wallet: Arc<dyn SigningCollaborator>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        let store = GameStore::new();
        let status = StatusChannel::new();

        let engine = Arc::new(ReconciliationEngine::new(
            api,
            store.ledger_writer(),
            status.clone(),
            EngineConfig::from(&config),
        ));
        let session = Arc::new(SessionMonitor::new(
            Arc::clone(&wallet),
            status.clone(),
            store.session_writer(),
            config.expected_network,
        ));
        let submitter =
            TransactionSubmitter::new(wallet, Arc::clone(&session), status.clone(), &config);

        store.select_asset(preferences::load_asset(preferences.as_ref()));
        let locale = RwLock::new(preferences::load_locale(preferences.as_ref()));

        Self {
            config,
            store,
            status,
            engine,
            session,
            submitter,
            preferences,
            locale,
        }
    }

    /// Create a session that queries the configured node over HTTP.
    pub fn connect(
        config: LotteryConfig,
        wallet: Arc<dyn SigningCollaborator>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Result<Self, NetworkError> {
        let api = Arc::new(RemoteStoreClient::new(config.client_config())?);
        Ok(Self::new(config, api, wallet, preferences))
    }

    /// The session's configuration.
    pub fn config(&self) -> &LotteryConfig {
        &self.config
    }

    /// Start periodic reconciliation.
    pub fn start(&self) -> bool {
        self.engine.start()
    }

    /// Stop reconciliation and wallet monitoring.
    pub async fn stop(&self) {
        self.engine.stop().await;
        self.session.stop().await;
    }

    /// Run a single reconciliation pass.
    pub async fn poll_once(&self) -> PassOutcome {
        self.engine.poll_once().await
    }

    /// Buy `cell` with the selected asset.
    pub async fn buy(&self, cell: CellIndex) -> BuyOutcome {
        let asset = self.store.snapshot().selected_asset;
        self.submitter.buy(cell, asset).await
    }

    /// Select and persist the payment asset.
    pub fn select_asset(&self, asset: Asset) -> std::io::Result<()> {
        self.store.select_asset(asset);
        self.preferences.set(ASSET_KEY, asset.key())
    }

    /// Active interface language.
    pub fn locale(&self) -> Locale {
        *self.locale.read()
    }

    /// Switch and persist the interface language.
    pub fn set_locale(&self, locale: Locale) -> std::io::Result<()> {
        *self.locale.write() = locale;
        self.preferences.set(LOCALE_KEY, locale.tag())
    }

    /// Copy of the current game state.
    pub fn snapshot(&self) -> GameState {
        self.store.snapshot()
    }

    /// Subscribe to game state changes.
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.store.subscribe()
    }

    /// Current status.
    pub fn status(&self) -> Status {
        self.status.latest()
    }

    /// Current status text in the active locale.
    pub fn status_text(&self) -> String {
        self.status.latest().render(self.locale())
    }

    /// Subscribe to status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    /// The wallet session monitor.
    pub fn session(&self) -> &SessionMonitor {
        &self.session
    }

    /// The reconciliation engine.
    pub fn engine(&self) -> &Arc<ReconciliationEngine> {
        &self.engine
    }
}

impl Drop for GameClient {
    fn drop(&mut self) {
        self.engine.cancel();
    }
}
