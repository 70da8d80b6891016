//! Per-cell completion weights for one player.
//!
//! From every piece the player owns, a three-cell probe is cast in each of the
//! eight directions. A probe counts only if it stays on the board and holds no
//! opposing piece; the number of the player's own pieces inside it becomes
//! the weight of each empty, currently playable cell it covers.

use crate::game::{Board, Cell, Direction, Player, Position, COLS, ROWS, WIN_LENGTH};

/// Cell extends a two-piece line.
pub const WEAK: u8 = 1;
/// Cell completes a three-piece line.
pub const STRONG: u8 = 2;

const PROBE_LEN: usize = WIN_LENGTH - 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightMap {
    player: Player,
    weights: [[u8; COLS]; ROWS],
}

impl WeightMap {
    /// Score every playable empty cell for `player`.
    ///
    /// An opposing piece anywhere in a probe invalidates the whole direction.
    /// Along a probe, empty cells after the first unsupported one are skipped.
    pub fn compute(board: &Board, player: Player) -> Self {
        let mut weights = [[0u8; COLS]; ROWS];
        let own = Cell::Occupied(player);
        let foe = Cell::Occupied(player.other());

        for origin in board.pieces(player) {
            for dir in Direction::ALL {
                let probe: Vec<Position> = origin.ray(dir, PROBE_LEN).collect();
                if probe.len() < PROBE_LEN {
                    continue;
                }
                if probe.iter().any(|&p| board.occupant(p) == foe) {
                    continue;
                }

                let weight = probe.iter().filter(|&&p| board.occupant(p) == own).count() as u8;
                for &p in &probe {
                    if !board.occupant(p).is_empty() {
                        continue;
                    }
                    if !board.is_playable(p) {
                        break;
                    }
                    let slot = &mut weights[p.row()][p.col()];
                    *slot = (*slot).max(weight);
                }
            }
        }

        WeightMap { player, weights }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn weight(&self, pos: Position) -> u8 {
        self.weights[pos.row()][pos.col()]
    }

    /// Playable cells carrying exactly `weight`, top row first
    pub fn cells_with(&self, weight: u8) -> Vec<Position> {
        (0..ROWS)
            .flat_map(|row| (0..COLS).filter_map(move |col| Position::new(row, col)))
            .filter(|&p| self.weight(p) == weight)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn board(rows: [&str; ROWS]) -> Board {
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn empty_board_has_no_weight() {
        let map = WeightMap::compute(&Board::new(), Player::First);
        assert!(map.cells_with(WEAK).is_empty());
        assert!(map.cells_with(STRONG).is_empty());
    }

    #[test]
    fn lone_piece_scores_nothing() {
        let b = board([".......", ".......", ".......", ".......", ".......", "...X..."]);
        let map = WeightMap::compute(&b, Player::First);
        assert!(map.cells_with(WEAK).is_empty());
        assert!(map.cells_with(STRONG).is_empty());
    }

    #[test]
    fn three_in_a_row_marks_completion_strong() {
        let b = board([".......", ".......", ".......", ".......", ".......", "XXX...."]);
        let map = WeightMap::compute(&b, Player::First);
        assert_eq!(map.cells_with(STRONG), vec![pos(5, 3)]);
        assert_eq!(map.player(), Player::First);
    }

    #[test]
    fn gap_in_line_is_strong() {
        let b = board([".......", ".......", ".......", ".......", ".......", "OO.O..."]);
        let map = WeightMap::compute(&b, Player::Second);
        assert_eq!(map.weight(pos(5, 2)), STRONG);
    }

    #[test]
    fn two_in_a_row_marks_extensions_weak() {
        let b = board([".......", ".......", ".......", ".......", ".......", "OO....."]);
        let map = WeightMap::compute(&b, Player::Second);
        assert_eq!(map.cells_with(WEAK), vec![pos(5, 2), pos(5, 3)]);
        assert!(map.cells_with(STRONG).is_empty());
    }

    #[test]
    fn opposing_piece_in_probe_blocks_direction() {
        let b = board([".......", ".......", ".......", ".......", ".......", "XX.O..."]);
        let map = WeightMap::compute(&b, Player::First);
        assert_eq!(map.weight(pos(5, 2)), 0);
    }

    #[test]
    fn probe_running_off_board_is_ignored() {
        // Rightward probes from (5,4) and (5,5) run off the board.
        let b = board([".......", ".......", ".......", ".......", ".......", "....XX."]);
        let map = WeightMap::compute(&b, Player::First);
        assert_eq!(map.weight(pos(5, 6)), 0);
        assert_eq!(map.weight(pos(5, 3)), WEAK);
    }

    #[test]
    fn unsupported_cells_are_excluded() {
        let b = board([".......", ".......", ".......", ".......", "...X...", "...X..."]);
        let map = WeightMap::compute(&b, Player::First);
        assert_eq!(map.weight(pos(3, 3)), WEAK);
        assert_eq!(map.weight(pos(2, 3)), 0);
        // Diagonal neighbours of the upper piece rest on empty cells.
        assert_eq!(map.weight(pos(3, 2)), 0);
        assert_eq!(map.weight(pos(3, 4)), 0);
    }

    #[test]
    fn weights_only_land_on_drop_targets() {
        let b = board([".......", ".......", "..O....", "..XX...", ".OXOX..", "OXOXO.X"]);
        for player in Player::ALL {
            let map = WeightMap::compute(&b, player);
            for weight in [WEAK, STRONG] {
                for p in map.cells_with(weight) {
                    assert!(b.is_playable(p), "{p} is not a drop target");
                }
            }
        }
    }
}
