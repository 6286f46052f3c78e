//! Reconciliation of local game state with the game account's storage.
//!
//! A pass runs in fixed order:
//!
//! 1. Fetch the `round` and `lastWin` entries. Failure abandons the pass
//!    before anything is written.
//! 2. Replace the current round.
//! 3. Replace the last winner.
//! 4. Fetch the full data listing and keep keys `0..=99`.
//! 5. Decode each kept entry into a cell; malformed values are skipped and
//!    reported.
//! 6. Overwrite each decoded cell's slot.
//! 7. Refresh the game account's balances. Failure here leaves the
//!    updates of steps 2-6 in place.
//!
//! Every failure is published to the status slot; [`ReconciliationEngine::poll_once`]
//! never returns an error.

use crate::config::{AssetConfig, LotteryConfig, MIN_POLL_INTERVAL};
use crate::state::{LedgerWriter, RejectedCell};
use crate::status::StatusChannel;
use lottery_client::{DataEntry, EntryValue, NetworkError, QueryApi};
use lottery_types::codec::{self, MalformedEntry};
use lottery_types::{Address, Amount, Balances, Cell, CellIndex, Round, Status};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Key of the round counter entry.
pub const ROUND_KEY: &str = "round";

/// Key of the last-winner entry.
pub const LAST_WIN_KEY: &str = "lastWin";

/// Why a pass was abandoned.
#[derive(Debug, Error)]
pub enum PassError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("round entry is not a non-negative integer: {0:?}")]
    InvalidRound(EntryValue),

    #[error("lastWin entry is not a string: {0:?}")]
    InvalidLastWin(EntryValue),

    #[error("lastWin entry is malformed: {0}")]
    MalformedLastWin(#[from] MalformedEntry),
}

/// What a completed pass observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Round held before the pass.
    pub previous_round: Round,
    /// Round reported by the node.
    pub round: Round,
    /// Cells whose value changed.
    pub changed_cells: Vec<CellIndex>,
    /// Cells skipped by the regression check.
    pub rejected_cells: Vec<RejectedCell>,
    /// Cell entries that failed to decode.
    pub malformed: Vec<(CellIndex, MalformedEntry)>,
    /// Balance refresh failure, if any.
    pub balance_error: Option<String>,
}

impl PassReport {
    /// Whether the node reported a different round than we held.
    pub fn round_changed(&self) -> bool {
        self.previous_round != self.round
    }
}

/// Result of [`ReconciliationEngine::poll_once`].
#[derive(Debug)]
pub enum PassOutcome {
    /// All steps ran; balance refresh may still have failed.
    Completed(PassReport),
    /// Another pass was in flight.
    Skipped,
    /// The pass was abandoned.
    Failed(PassError),
}

impl PassOutcome {
    /// The report of a completed pass.
    pub fn report(&self) -> Option<&PassReport> {
        match self {
            PassOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// Settings the engine reads from [`LotteryConfig`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub game_address: Address,
    pub poll_interval: Duration,
    pub native_asset: AssetConfig,
    pub token_asset: AssetConfig,
    pub reject_round_regression: bool,
}

impl From<&LotteryConfig> for EngineConfig {
    fn from(config: &LotteryConfig) -> Self {
        Self {
            game_address: config.game_address.clone(),
            poll_interval: config.poll_interval(),
            native_asset: config.native_asset.clone(),
            token_asset: config.token_asset.clone(),
            reject_round_regression: config.reject_round_regression,
        }
    }
}

/// Marks a pass as in flight; cleared on drop.
struct PassGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> PassGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

struct RunningTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Periodically pulls the game account's storage into the local state.
pub struct ReconciliationEngine {
    api: Arc<dyn QueryApi>,
    ledger: LedgerWriter,
    status: StatusChannel,
    config: EngineConfig,
    in_flight: AtomicBool,
    task: Mutex<Option<RunningTask>>,
}

impl ReconciliationEngine {
    /// Create an engine. Call [`start`](Self::start) to begin polling.
    pub fn new(
        api: Arc<dyn QueryApi>,
        ledger: LedgerWriter,
        status: StatusChannel,
        config: EngineConfig,
    ) -> Self {
        Self {
            api,
            ledger,
            status,
            config,
            in_flight: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Start polling every `poll_interval`, beginning immediately.
    ///
    /// Passes never overlap: a tick that comes due while a pass is running
    /// is skipped. Returns `false` if already running.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut task = self.task.lock();
        if task.is_some() {
            return false;
        }

        let token = CancellationToken::new();
        let engine = Arc::clone(self);
        let child = token.clone();
        let handle = tokio::spawn(async move { engine.run(child).await });

        info!(interval = ?self.config.poll_interval, "Reconciliation started");
        *task = Some(RunningTask { token, handle });
        true
    }

    /// Stop polling. A pass already running completes first.
    pub async fn stop(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task {
            task.token.cancel();
            let _ = task.handle.await;
            info!("Reconciliation stopped");
        }
    }

    /// Stop polling without waiting for a running pass.
    pub fn cancel(&self) {
        if let Some(task) = self.task.lock().take() {
            task.token.cancel();
            debug!("Reconciliation cancelled");
        }
    }

    /// Whether the periodic task is running.
    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }

    async fn run(&self, token: CancellationToken) {
        let mut tick = tokio::time::interval(self.config.poll_interval.max(MIN_POLL_INTERVAL));
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tick.tick() => {
                    self.poll_once().await;
                }
            }
        }
    }

    /// Run one reconciliation pass.
    pub async fn poll_once(&self) -> PassOutcome {
        let Some(_guard) = PassGuard::acquire(&self.in_flight) else {
            debug!("Reconciliation pass already in flight");
            return PassOutcome::Skipped;
        };

        match self.reconcile().await {
            Ok(report) => {
                debug!(
                    round = %report.round,
                    changed = report.changed_cells.len(),
                    malformed = report.malformed.len(),
                    "Reconciliation pass complete"
                );
                PassOutcome::Completed(report)
            }
            Err(e) => {
                warn!(error = %e, "Reconciliation pass abandoned");
                self.status.publish(Status::error(e.to_string()));
                PassOutcome::Failed(e)
            }
        }
    }

    async fn reconcile(&self) -> Result<PassReport, PassError> {
        // Step 1: both scalar entries, before any write.
        let round_entry = self.api.get_entry(ROUND_KEY).await?;
        let last_win_entry = self.api.get_entry(LAST_WIN_KEY).await?;

        let round = round_entry
            .as_integer()
            .and_then(|value| u64::try_from(value).ok())
            .map(Round)
            .ok_or_else(|| PassError::InvalidRound(round_entry.value.clone()))?;
        let last_win = last_win_entry
            .as_text()
            .ok_or_else(|| PassError::InvalidLastWin(last_win_entry.value.clone()))?;
        let winner = codec::decode_last_winner(last_win)?;

        // Steps 2-3.
        let previous_round = self.ledger.set_round_and_winner(round, winner);
        if previous_round != round {
            info!(from = %previous_round, to = %round, "Round changed");
        }

        // Steps 4-5.
        let entries = self.api.get_all_entries().await?;
        let (candidates, malformed) = decode_cells(entries);
        for (index, e) in &malformed {
            warn!(cell = %index, error = %e, "Skipping malformed cell entry");
        }

        // Step 6.
        let merge = self
            .ledger
            .merge_cells(candidates, self.config.reject_round_regression);
        for rejected in &merge.rejected {
            warn!(
                cell = %rejected.index,
                stored = %rejected.stored,
                fetched = %rejected.fetched,
                "Rejected cell with older round"
            );
        }

        // Step 7.
        let balance_error = match self.fetch_balances().await {
            Ok(balances) => {
                self.ledger.set_balances(balances);
                None
            }
            Err(e) => {
                warn!(error = %e, "Balance refresh failed");
                self.status.publish(Status::error(e.to_string()));
                Some(e.to_string())
            }
        };

        Ok(PassReport {
            previous_round,
            round,
            changed_cells: merge.changed,
            rejected_cells: merge.rejected,
            malformed,
            balance_error,
        })
    }

    async fn fetch_balances(&self) -> Result<Balances, NetworkError> {
        let game = &self.config.game_address;
        let token = self
            .api
            .token_balance(game, &self.config.token_asset.id)
            .await?;
        let native = self.api.native_balance(game).await?;
        Ok(Balances {
            native: Amount::new(native, self.config.native_asset.decimals),
            token: Amount::new(token, self.config.token_asset.decimals),
        })
    }
}

/// Keep entries keyed `0..=99` and decode them into cells.
fn decode_cells(entries: Vec<DataEntry>) -> (Vec<Cell>, Vec<(CellIndex, MalformedEntry)>) {
    let mut cells = Vec::new();
    let mut malformed = Vec::new();

    for entry in entries {
        let Some(index) = CellIndex::from_key(&entry.key) else {
            continue;
        };
        let raw = match entry.value {
            EntryValue::Text(text) => text,
            EntryValue::Integer(value) => value.to_string(),
            EntryValue::Boolean(value) => value.to_string(),
        };
        match codec::decode_cell_value(&raw) {
            Ok(value) => cells.push(value.into_cell(index)),
            Err(e) => malformed.push((index, e)),
        }
    }

    (cells, malformed)
}
