//! # Connect Four
//!
//! A two-player Connect Four engine with an automated opponent. Pieces fall
//! to the lowest open cell of a column; four in a row on any axis wins.
//!
//! ## Modules
//!
//! - [`game`] — Core game logic: board, win detection, turn/state controller
//! - [`ai`] — Agent trait, threat-weight heuristic bot, random agent
//! - [`ui`] — Terminal UI driving the controller
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
