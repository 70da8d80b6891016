//! Four-in-a-row detection.
//!
//! [`find_winner`] is the per-move check: it only reads the four lines that
//! pass through the cell just played. [`scan_board`] walks every line on the
//! board and is meant for validating boards that were not built move by move.

use std::fmt;

use super::board::{Axis, Board, Cell, Position, COLS, ROWS};
use super::Player;

pub const WIN_LENGTH: usize = 4;

/// The four aligned positions of a win, in line reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment([Position; WIN_LENGTH]);

impl Segment {
    pub fn positions(&self) -> &[Position; WIN_LENGTH] {
        &self.0
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{a} {b} {c} {d}]")
    }
}

/// Slide along `line` and return the first window of four consecutive cells
/// owned by `player`.
fn first_run(board: &Board, line: &[Position], player: Player) -> Option<Segment> {
    if line.len() < WIN_LENGTH {
        return None;
    }

    let mut run = 0;
    for (i, &pos) in line.iter().enumerate() {
        if board.occupant(pos) == Cell::Occupied(player) {
            run += 1;
        } else {
            run = 0;
        }
        if run == WIN_LENGTH {
            let start = i + 1 - WIN_LENGTH;
            let mut segment = [pos; WIN_LENGTH];
            segment.copy_from_slice(&line[start..=i]);
            return Some(Segment(segment));
        }
    }
    None
}

/// Check whether the piece at `last` completed four in a row.
///
/// Each axis through `last` is read end to end; when a run is longer than four
/// the earliest window in reading order is returned (leftmost for rows, topmost
/// for columns and diagonals).
pub fn find_winner(board: &Board, last: Position) -> Option<Segment> {
    let player = board.occupant(last).player()?;

    Axis::ALL
        .iter()
        .find_map(|axis| first_run(board, &axis.line_through(last), player))
}

/// Full-board scan of every row, column and diagonal of length four or more.
///
/// Axes are searched in the same order as [`find_winner`], and each line from
/// its first cell in reading order, so a board reached by play yields the same
/// segment from both checks.
pub fn scan_board(board: &Board) -> Option<(Player, Segment)> {
    Axis::ALL.iter().find_map(|&axis| {
        let back = axis.direction().opposite();
        (0..ROWS)
            .flat_map(|row| (0..COLS).filter_map(move |col| Position::new(row, col)))
            .filter(|start| start.neighbor(back).is_none())
            .map(|start| axis.line_through(start))
            .filter(|line| line.len() >= WIN_LENGTH)
            .find_map(|line| {
                Player::ALL
                    .iter()
                    .find_map(|&player| first_run(board, &line, player).map(|s| (player, s)))
            })
    })
}
