use crate::game::{Board, Player, Position};

/// Interface for automated players.
///
/// Implementations read the board and return the drop target they want to
/// play; they never mutate the board. The controller performs the placement.
pub trait Agent {
    /// Pick a move for `player`, or `None` if every column is full.
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Position>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
