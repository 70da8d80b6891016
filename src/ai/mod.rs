//! Automated players: the threat-weight heuristic bot and a uniform random
//! baseline, both behind the [`Agent`] trait.

mod agent;
mod bot;
mod random;
pub mod threat;

pub use agent::Agent;
pub use bot::{rank_moves, BotEngine, Candidates, Tier};
pub use random::RandomAgent;
pub use threat::WeightMap;
