//! Text rendering of the board.

use lottery_core::{GameState, LotteryConfig};
use lottery_types::{Asset, Locale, MessageKey, Status, CELL_COUNT};
use std::fmt::Write;

/// Cells per board row.
pub const ROW_WIDTH: usize = 10;

/// Render the board, header and status line in `locale`.
///
/// Cells bought in the current round are bracketed; free cells show their
/// index only.
pub fn render_board(
    state: &GameState,
    status: &Status,
    locale: Locale,
    config: &LotteryConfig,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}: {} ({})",
        locale.text(MessageKey::GameAddress),
        config.game_address,
        config.explorer_address_url(&config.game_address)
    );
    let _ = writeln!(
        out,
        "{}: {}",
        locale.text(MessageKey::Round),
        state.current_round.0
    );

    let last_win = match &state.last_winner.address {
        Some(address) => format!(
            "#{} {} ({})",
            state.last_winner.cell,
            address,
            config.explorer_address_url(address)
        ),
        None => locale.text(MessageKey::FirstRound).to_string(),
    };
    let _ = writeln!(out, "{}: {}", locale.text(MessageKey::LastWin), last_win);

    let _ = writeln!(
        out,
        "{}: {} {} | {} {}",
        locale.text(MessageKey::Balance),
        state.balances.native,
        asset_label(Asset::Native, state.selected_asset),
        state.balances.token,
        asset_label(Asset::Token, state.selected_asset),
    );
    out.push('\n');

    for row in state.cells.chunks(ROW_WIDTH).take(CELL_COUNT / ROW_WIDTH) {
        let line: Vec<String> = row
            .iter()
            .map(|cell| {
                if cell.is_taken_in(state.current_round) {
                    format!("[{:>2}]", cell.index.get())
                } else {
                    format!(" {:>2} ", cell.index.get())
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" ").trim_end());
    }

    if !status.is_cleared() {
        let _ = writeln!(out, "\n! {}", status.render(locale));
    }
    out
}

fn asset_label(asset: Asset, selected: Asset) -> String {
    let label = asset.key().to_uppercase();
    if asset == selected {
        format!("{}*", label)
    } else {
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottery_types::{Address, Amount, Balances, Cell, CellIndex, LastWinner, Round};

    fn board(state: &GameState, status: &Status, locale: Locale) -> Vec<String> {
        render_board(state, status, locale, &LotteryConfig::default())
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_initial_board() {
        let lines = board(&GameState::new(), &Status::cleared(), Locale::En);
        assert_eq!(lines[1], "Round: 1");
        assert_eq!(lines[2], "Last win: none (first round)");
        assert_eq!(lines[3], "Balance: 0 WAVES* | 0 WCT");
        assert_eq!(lines[5], "  0    1    2    3    4    5    6    7    8    9");
        assert_eq!(lines.len(), 15);
    }

    #[test]
    fn test_taken_cells_and_winner() {
        let mut state = GameState::new();
        state.current_round = Round(3);
        state.cells[12] = Cell {
            index: CellIndex::new(12).unwrap(),
            owner: Some(Address::new("3PA")),
            round: Round(3),
        };
        state.cells[13] = Cell {
            index: CellIndex::new(13).unwrap(),
            owner: Some(Address::new("3PB")),
            round: Round(2),
        };
        state.last_winner = LastWinner {
            cell: CellIndex::new(5).unwrap(),
            address: Some(Address::new("3PWin")),
        };
        state.balances = Balances {
            native: Amount::new(150_000_000, 8),
            token: Amount::new(1234, 2),
        };

        let lines = board(&state, &Status::cleared(), Locale::En);
        assert_eq!(
            lines[2],
            "Last win: #5 3PWin (https://wavesexplorer.com/address/3PWin)"
        );
        assert_eq!(lines[3], "Balance: 1.5 WAVES* | 12.34 WCT");
        assert!(lines[6].contains("[12]"));
        assert!(lines[6].contains(" 13 "));
    }

    #[test]
    fn test_status_line_is_localized() {
        let status = Status::translate(MessageKey::SwitchNetwork);
        let lines = board(&GameState::new(), &status, Locale::Ru);
        assert_eq!(lines.last().unwrap(), "! Смените сеть на MAINNET");
        assert_eq!(lines[1], "Раунд: 1");
    }
}
