use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::game::{Board, Player, Position, COLS};

use super::agent::Agent;
use super::threat::{WeightMap, STRONG, WEAK};

/// Selection priority, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Completes our own four in a row.
    Win,
    /// Stops the opponent completing theirs.
    Block,
    /// Extends one of our two-piece lines.
    Build,
    /// Cuts into one of the opponent's two-piece lines.
    Hinder,
    /// Any column with room.
    Any,
}

/// The drop targets of the best non-empty tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    pub tier: Tier,
    pub positions: Vec<Position>,
}

/// Group the current drop targets by priority for `player` and return the
/// best non-empty group, or `None` if the board is full.
pub fn rank_moves(board: &Board, player: Player) -> Option<Candidates> {
    let targets: Vec<Position> = (0..COLS)
        .filter_map(|col| board.drop_target(col).ok().flatten())
        .collect();
    if targets.is_empty() {
        return None;
    }

    let offense = WeightMap::compute(board, player);
    let defense = WeightMap::compute(board, player.other());

    let tiers = [
        (Tier::Win, &offense, STRONG),
        (Tier::Block, &defense, STRONG),
        (Tier::Build, &offense, WEAK),
        (Tier::Hinder, &defense, WEAK),
    ];
    for (tier, map, weight) in tiers {
        let positions: Vec<Position> = targets
            .iter()
            .copied()
            .filter(|&p| map.weight(p) == weight)
            .collect();
        if !positions.is_empty() {
            return Some(Candidates { tier, positions });
        }
    }

    Some(Candidates {
        tier: Tier::Any,
        positions: targets,
    })
}

/// Single-ply heuristic bot: win, else block, else build, else hinder, else
/// anything. Ties inside a tier are broken uniformly at random.
pub struct BotEngine<R = StdRng> {
    rng: R,
}

impl BotEngine<StdRng> {
    pub fn new() -> Self {
        BotEngine {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        BotEngine::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BotEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        BotEngine { rng }
    }
}

impl Default for BotEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Agent for BotEngine<R> {
    fn select_move(&mut self, board: &Board, player: Player) -> Option<Position> {
        let Candidates { tier, positions } = rank_moves(board, player)?;
        let choice = positions[self.rng.random_range(0..positions.len())];
        debug!(
            player = player.name(),
            ?tier,
            candidates = positions.len(),
            %choice,
            "bot selected move"
        );
        Some(choice)
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{find_winner, ROWS};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn board(rows: [&str; ROWS]) -> Board {
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn empty_board_offers_every_column() {
        let candidates = rank_moves(&Board::new(), Player::First).unwrap();
        assert_eq!(candidates.tier, Tier::Any);
        assert_eq!(candidates.positions.len(), COLS);
    }

    #[test]
    fn full_board_has_no_move() {
        let b = board([
            "XOXOXOX", "XOXOXOX", "OXOXOXO", "OXOXOXO", "XOXOXOX", "XOXOXOX",
        ]);
        assert_eq!(rank_moves(&b, Player::First), None);
        assert_eq!(BotEngine::seeded(1).select_move(&b, Player::First), None);
    }

    #[test]
    fn prefers_own_win_over_block() {
        // Second (bot) completes the bottom row at column 3; First threatens
        // the top of column 6.
        let b = board([".......", ".......", ".......", "......X", "......X", "OOO...X"]);
        let candidates = rank_moves(&b, Player::Second).unwrap();
        assert_eq!(candidates.tier, Tier::Win);
        assert_eq!(candidates.positions, vec![pos(5, 3)]);

        let mut bot = BotEngine::seeded(42);
        for _ in 0..20 {
            assert_eq!(bot.select_move(&b, Player::Second), Some(pos(5, 3)));
        }
    }

    #[test]
    fn blocks_when_it_cannot_win() {
        let b = board([".......", ".......", ".......", ".......", "OO.....", "XXX...."]);
        let candidates = rank_moves(&b, Player::Second).unwrap();
        assert_eq!(candidates.tier, Tier::Block);
        assert_eq!(candidates.positions, vec![pos(5, 3)]);
        assert_eq!(
            BotEngine::seeded(5).select_move(&b, Player::Second),
            Some(pos(5, 3))
        );
    }

    #[test]
    fn block_leaves_opponent_without_win() {
        let mut b = board([".......", ".......", ".......", ".......", "OO.....", "XXX...."]);
        let choice = BotEngine::seeded(9).select_move(&b, Player::Second).unwrap();
        b.place(choice, Player::Second).unwrap();
        let rescue = b.drop_target(3).unwrap().unwrap();
        b.place(rescue, Player::First).unwrap();
        assert_eq!(find_winner(&b, rescue), None);
    }

    #[test]
    fn builds_before_hindering() {
        let b = board([".......", ".......", ".......", ".......", "......X", "OO....X"]);
        let candidates = rank_moves(&b, Player::Second).unwrap();
        assert_eq!(candidates.tier, Tier::Build);
        assert_eq!(candidates.positions, vec![pos(5, 2), pos(5, 3)]);
    }

    #[test]
    fn hinders_when_nothing_better() {
        let b = board([".......", ".......", ".......", ".......", "......X", "O.....X"]);
        let candidates = rank_moves(&b, Player::Second).unwrap();
        assert_eq!(candidates.tier, Tier::Hinder);
        assert_eq!(candidates.positions, vec![pos(3, 6)]);
    }

    #[test]
    fn ties_are_broken_randomly_within_tier() {
        let b = board([".......", ".......", ".......", ".......", ".......", "OO....."]);
        let expected = rank_moves(&b, Player::Second).unwrap().positions;

        let mut bot = BotEngine::seeded(2024);
        let mut seen = Vec::new();
        for _ in 0..200 {
            let choice = bot.select_move(&b, Player::Second).unwrap();
            assert!(expected.contains(&choice), "{choice} outside candidate set");
            if !seen.contains(&choice) {
                seen.push(choice);
            }
        }
        assert_eq!(seen.len(), expected.len());
    }

    #[test]
    fn never_picks_full_column() {
        let b = board(["X......", "O......", "X......", "O......", "X......", "O......"]);
        let mut bot = BotEngine::seeded(8);
        for _ in 0..100 {
            let choice = bot.select_move(&b, Player::First).unwrap();
            assert_ne!(choice.col(), 0);
        }
    }

    #[test]
    fn select_move_leaves_board_untouched() {
        let b = board([".......", ".......", ".......", ".......", "OO.....", "XXX...."]);
        let before = b;
        BotEngine::seeded(0).select_move(&b, Player::Second);
        assert_eq!(b, before);
    }

    #[test]
    fn name_is_heuristic() {
        assert_eq!(BotEngine::new().name(), "Heuristic");
    }
}
