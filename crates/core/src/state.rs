//! Game state container.
//!
//! [`GameStore`] owns the single [`GameState`] of a session. Mutation goes
//! through writers with disjoint field sets:
//!
//! - [`LedgerWriter`] (reconciliation): cells, round, last winner, balances
//! - [`SessionWriter`] (wallet session): user address, purchase flag
//! - [`GameStore::select_asset`] (user preference): selected asset
//!
//! Readers take snapshots or subscribe to changes.

use lottery_types::{Address, Asset, Balances, Cell, CellIndex, LastWinner, Round, CELL_COUNT};
use std::sync::Arc;
use tokio::sync::watch;

/// Snapshot of everything the client knows about the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// All cells, indexed by [`CellIndex`].
    pub cells: Vec<Cell>,
    pub current_round: Round,
    pub last_winner: LastWinner,
    /// Balances of the game account.
    pub balances: Balances,
    /// Wallet account, once a ready session has been observed.
    pub user_address: Option<Address>,
    /// Whether purchase actions are offered.
    pub purchase_enabled: bool,
    pub selected_asset: Asset,
}

impl GameState {
    /// Initial state: every cell unpurchased, round 1, no winner yet.
    pub fn new() -> Self {
        Self {
            cells: CellIndex::all().map(Cell::empty).collect(),
            current_round: Round::FIRST,
            last_winner: LastWinner::none(),
            balances: Balances::default(),
            user_address: None,
            purchase_enabled: true,
            selected_asset: Asset::default(),
        }
    }

    /// The cell at `index`.
    pub fn cell(&self, index: CellIndex) -> &Cell {
        &self.cells[index.get()]
    }

    /// Number of cells bought in the current round.
    pub fn taken_in_current_round(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.is_taken_in(self.current_round))
            .count()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// A fetched cell discarded because its round is older than the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCell {
    pub index: CellIndex,
    pub stored: Round,
    pub fetched: Round,
}

/// Outcome of merging fetched cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellMerge {
    /// Cells whose value changed.
    pub changed: Vec<CellIndex>,
    /// Cells left untouched by the regression check.
    pub rejected: Vec<RejectedCell>,
}

/// Owner of the session's [`GameState`].
#[derive(Debug, Clone)]
pub struct GameStore {
    tx: Arc<watch::Sender<GameState>>,
}

impl GameStore {
    /// Create a store holding [`GameState::new`].
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(GameState::new());
        Self { tx: Arc::new(tx) }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> GameState {
        self.tx.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.tx.subscribe()
    }

    /// Writer for the reconciliation-owned fields.
    pub fn ledger_writer(&self) -> LedgerWriter {
        LedgerWriter {
            tx: Arc::clone(&self.tx),
        }
    }

    /// Writer for the session-owned fields.
    pub fn session_writer(&self) -> SessionWriter {
        SessionWriter {
            tx: Arc::clone(&self.tx),
        }
    }

    /// Record the user's asset preference.
    pub fn select_asset(&self, asset: Asset) {
        self.tx.send_if_modified(|state| {
            let modified = state.selected_asset != asset;
            state.selected_asset = asset;
            modified
        });
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes cells, round, last winner and balances.
#[derive(Debug, Clone)]
pub struct LedgerWriter {
    tx: Arc<watch::Sender<GameState>>,
}

impl LedgerWriter {
    /// Replace the round and last winner together. Returns the previous round.
    pub fn set_round_and_winner(&self, round: Round, winner: LastWinner) -> Round {
        let mut previous = round;
        self.tx.send_if_modified(|state| {
            previous = state.current_round;
            let modified = state.current_round != round || state.last_winner != winner;
            state.current_round = round;
            state.last_winner = winner;
            modified
        });
        previous
    }

    /// Overwrite each candidate's slot with the candidate.
    ///
    /// With `reject_regression`, a candidate whose round is lower than the
    /// stored cell's round is skipped instead.
    pub fn merge_cells(&self, candidates: Vec<Cell>, reject_regression: bool) -> CellMerge {
        let mut merge = CellMerge::default();
        self.tx.send_if_modified(|state| {
            for candidate in candidates {
                let slot = &mut state.cells[candidate.index.get()];
                if reject_regression && candidate.round < slot.round {
                    merge.rejected.push(RejectedCell {
                        index: candidate.index,
                        stored: slot.round,
                        fetched: candidate.round,
                    });
                    continue;
                }
                if *slot != candidate {
                    merge.changed.push(candidate.index);
                    *slot = candidate;
                }
            }
            !merge.changed.is_empty()
        });
        merge
    }

    /// Replace the game account's balances.
    pub fn set_balances(&self, balances: Balances) {
        self.tx.send_if_modified(|state| {
            let modified = state.balances != balances;
            state.balances = balances;
            modified
        });
    }
}

/// Writes the wallet account and purchase flag.
#[derive(Debug, Clone)]
pub struct SessionWriter {
    tx: Arc<watch::Sender<GameState>>,
}

impl SessionWriter {
    /// Set the connected wallet account.
    pub fn set_user_address(&self, address: Address) {
        self.tx.send_if_modified(|state| {
            let modified = state.user_address.as_ref() != Some(&address);
            state.user_address = Some(address);
            modified
        });
    }

    /// Offer or withdraw purchase actions.
    pub fn set_purchase_enabled(&self, enabled: bool) {
        self.tx.send_if_modified(|state| {
            let modified = state.purchase_enabled != enabled;
            state.purchase_enabled = enabled;
            modified
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottery_types::Amount;

    fn owned(index: usize, owner: &str, round: u64) -> Cell {
        Cell {
            index: CellIndex::new(index).unwrap(),
            owner: Some(Address::new(owner)),
            round: Round(round),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.cells.len(), CELL_COUNT);
        assert!(state.cells.iter().all(|cell| cell.round == Round::NEVER));
        assert!(state
            .cells
            .iter()
            .enumerate()
            .all(|(i, cell)| cell.index.get() == i));
        assert_eq!(state.current_round, Round::FIRST);
        assert!(state.last_winner.is_none());
        assert!(state.user_address.is_none());
    }

    #[test]
    fn test_merge_replaces_by_index_only() {
        let store = GameStore::new();
        let ledger = store.ledger_writer();
        let before = store.snapshot();

        let merge = ledger.merge_cells(vec![owned(3, "a", 1), owned(50, "b", 1)], false);
        assert_eq!(
            merge.changed,
            vec![CellIndex::new(3).unwrap(), CellIndex::new(50).unwrap()]
        );

        let after = store.snapshot();
        for index in CellIndex::all() {
            if index.get() == 3 || index.get() == 50 {
                assert_ne!(after.cell(index), before.cell(index));
            } else {
                assert_eq!(after.cell(index), before.cell(index));
            }
        }
    }

    #[test]
    fn test_merge_unchanged_cell_is_not_reported() {
        let store = GameStore::new();
        let ledger = store.ledger_writer();
        ledger.merge_cells(vec![owned(7, "a", 2)], false);

        let mut rx = store.subscribe();
        rx.borrow_and_update();
        let merge = ledger.merge_cells(vec![owned(7, "a", 2)], false);
        assert!(merge.changed.is_empty());
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_merge_regression_policy() {
        let store = GameStore::new();
        let ledger = store.ledger_writer();
        ledger.merge_cells(vec![owned(1, "new", 5)], false);

        let merge = ledger.merge_cells(vec![owned(1, "old", 4)], true);
        assert_eq!(merge.rejected.len(), 1);
        assert_eq!(merge.rejected[0].stored, Round(5));
        assert_eq!(store.snapshot().cells[1].round, Round(5));

        let merge = ledger.merge_cells(vec![owned(1, "old", 4)], false);
        assert_eq!(merge.changed.len(), 1);
        assert_eq!(store.snapshot().cells[1].round, Round(4));
    }

    #[test]
    fn test_round_and_winner_returns_previous_round() {
        let store = GameStore::new();
        let ledger = store.ledger_writer();

        let previous = ledger.set_round_and_winner(Round(3), LastWinner::none());
        assert_eq!(previous, Round::FIRST);
        let previous = ledger.set_round_and_winner(Round(3), LastWinner::none());
        assert_eq!(previous, Round(3));
    }

    #[test]
    fn test_writers_touch_disjoint_fields() {
        let store = GameStore::new();
        store.session_writer().set_user_address(Address::new("user"));
        store.session_writer().set_purchase_enabled(false);
        store.ledger_writer().set_balances(Balances {
            native: Amount::new(5, 8),
            token: Amount::new(7, 2),
        });
        store.select_asset(Asset::Token);

        let state = store.snapshot();
        assert_eq!(state.user_address, Some(Address::new("user")));
        assert!(!state.purchase_enabled);
        assert_eq!(state.balances.token.minor, 7);
        assert_eq!(state.selected_asset, Asset::Token);
        assert_eq!(state.current_round, Round::FIRST);
    }
}
