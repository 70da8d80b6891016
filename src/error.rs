use std::path::PathBuf;

use crate::game::Position;

/// Errors raised by board operations and the game controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("column {0} is outside the board")]
    OutOfRange(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("cannot place a piece at {0}: cell is occupied or unsupported")]
    InvalidPlacement(Position),

    #[error("no moves accepted while the game is {state}")]
    IllegalStateTransition { state: &'static str },

    #[error("it is not the bot's turn")]
    NotBotTurn,

    #[error("bot found no legal move")]
    NoBotMove,

    #[error("malformed board text: {0}")]
    MalformedBoard(String),
}

/// Reasons a reset request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResetError {
    #[error("game is still in progress")]
    GameInProgress,

    #[error("end-of-game presentation has not been acknowledged yet")]
    NotReady,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_display() {
        let err = GameError::ColumnFull(4);
        assert_eq!(err.to_string(), "column 4 is full");

        let err = GameError::InvalidPlacement(Position::new(2, 3).unwrap());
        assert_eq!(
            err.to_string(),
            "cannot place a piece at (2, 3): cell is occupied or unsupported"
        );
    }

    #[test]
    fn test_illegal_state_display() {
        let err = GameError::IllegalStateTransition { state: "won" };
        assert_eq!(err.to_string(), "no moves accepted while the game is won");

        assert_eq!(GameError::NotBotTurn.to_string(), "it is not the bot's turn");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("ui.win_flourish_ms must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: ui.win_flourish_ms must be > 0"
        );
    }
}
