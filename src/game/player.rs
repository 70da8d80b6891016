use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    First,
    Second,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::First, Player::Second];

    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Pick a starting player uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Player {
        if rng.random_bool(0.5) {
            Player::First
        } else {
            Player::Second
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::First => "Red",
            Player::Second => "Yellow",
        }
    }

    /// Single-character board notation
    pub fn symbol(self) -> char {
        match self {
            Player::First => 'X',
            Player::Second => 'O',
        }
    }
}
