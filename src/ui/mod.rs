//! Terminal UI: renders the board and feeds key presses and timers into the
//! game controller.

mod app;
mod game_view;

pub use app::App;
