use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{Board, Player, Position};

use super::agent::Agent;

/// An agent that drops into a uniformly random non-full column.
pub struct RandomAgent<R = StdRng> {
    rng: R,
}

impl RandomAgent<StdRng> {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomAgent::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomAgent<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomAgent { rng }
    }
}

impl Default for RandomAgent<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Agent for RandomAgent<R> {
    fn select_move(&mut self, board: &Board, _player: Player) -> Option<Position> {
        let columns = board.legal_columns();
        if columns.is_empty() {
            return None;
        }
        let col = columns[self.rng.random_range(0..columns.len())];
        board.drop_target(col).ok().flatten()
    }

    fn name(&self) -> &str {
        "Random"
    }
}
