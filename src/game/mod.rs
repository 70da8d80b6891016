//! Core Connect Four game logic: board and line walking, players, win
//! detection, and the turn/state controller.

mod board;
mod player;
mod state;
mod win;

pub use board::{Axis, Board, Cell, Direction, Position, CELL_COUNT, COLS, ROWS};
pub use player::Player;
pub use state::{GameController, GameEvent, GameObserver, GameOutcome, GameState, Placement};
pub use win::{find_winner, scan_board, Segment, WIN_LENGTH};
