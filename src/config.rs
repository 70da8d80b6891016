use std::path::Path;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::ai::{Agent, BotEngine, RandomAgent};
use crate::error::ConfigError;
use crate::game::{GameController, Player, ROWS};

const MAX_THINK_DELAY_MS: u64 = 10_000;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub bot: BotConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the starting player and bot tie-breaks. OS entropy if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotKind {
    Heuristic,
    Random,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub enabled: bool,
    pub player: Player,
    pub kind: BotKind,
    /// Pause before the bot's move is requested
    pub think_delay_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            enabled: true,
            player: Player::Second,
            kind: BotKind::Heuristic,
            think_delay_ms: 600,
        }
    }
}

impl BotConfig {
    pub fn build_agent(&self, seed: Option<u64>) -> Box<dyn Agent> {
        match (self.kind, seed) {
            (BotKind::Heuristic, Some(seed)) => Box::new(BotEngine::seeded(seed)),
            (BotKind::Heuristic, None) => Box::new(BotEngine::new()),
            (BotKind::Random, Some(seed)) => Box::new(RandomAgent::seeded(seed)),
            (BotKind::Random, None) => Box::new(RandomAgent::new()),
        }
    }

    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the winning line is shown before a reset is allowed
    pub win_flourish_ms: u64,
    pub reset_base_delay_ms: u64,
    /// Added once for a tallest column of five pieces, twice for six
    pub reset_extra_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            win_flourish_ms: 800,
            reset_base_delay_ms: 1100,
            reset_extra_delay_ms: 200,
        }
    }
}

impl UiConfig {
    pub fn win_flourish(&self) -> Duration {
        Duration::from_millis(self.win_flourish_ms)
    }

    /// Time for the clearing animation, which grows with the tallest column.
    pub fn reset_delay(&self, tallest_column: usize) -> Duration {
        let extras = match tallest_column {
            h if h >= ROWS => 2,
            h if h == ROWS - 1 => 1,
            _ => 0,
        };
        Duration::from_millis(self.reset_base_delay_ms + extras * self.reset_extra_delay_ms)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.think_delay_ms > MAX_THINK_DELAY_MS {
            return Err(ConfigError::Validation(format!(
                "bot.think_delay_ms must be <= {MAX_THINK_DELAY_MS}"
            )));
        }
        if self.ui.win_flourish_ms == 0 {
            return Err(ConfigError::Validation(
                "ui.win_flourish_ms must be > 0".into(),
            ));
        }
        if self.ui.reset_base_delay_ms == 0 {
            return Err(ConfigError::Validation(
                "ui.reset_base_delay_ms must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Build a controller for a new session, seating the bot if enabled.
    pub fn build_controller(&self) -> GameController {
        let rng = match self.game.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let controller = GameController::with_rng(rng);
        if !self.bot.enabled {
            return controller;
        }
        let bot_seed = self.game.seed.map(|seed| seed.wrapping_add(1));
        controller.with_bot(self.bot.player, self.bot.build_agent(bot_seed))
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[bot]
player = "first"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot.player, Player::First);
        // Other fields should be defaults
        assert!(config.bot.enabled);
        assert_eq!(config.bot.kind, BotKind::Heuristic);
        assert_eq!(config.ui.win_flourish_ms, 800);
        assert_eq!(config.game.seed, None);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let default = AppConfig::default();
        assert_eq!(config.bot.think_delay_ms, default.bot.think_delay_ms);
        assert_eq!(config.ui.reset_base_delay_ms, default.ui.reset_base_delay_ms);
    }

    #[test]
    fn test_validation_rejects_long_think_delay() {
        let mut config = AppConfig::default();
        config.bot.think_delay_ms = 60_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_flourish() {
        let mut config = AppConfig::default();
        config.ui.win_flourish_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_reset_delay() {
        let mut config = AppConfig::default();
        config.ui.reset_base_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_bot_kind_fails_to_parse() {
        let result: Result<AppConfig, _> = toml::from_str("[bot]\nkind = \"minimax\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert!(config.bot.enabled);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[game]
seed = 12

[bot]
kind = "random"
think_delay_ms = 0
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.game.seed, Some(12));
        assert_eq!(config.bot.kind, BotKind::Random);
        assert_eq!(config.bot.think_delay(), Duration::ZERO);
        // Others are defaults
        assert_eq!(config.bot.player, Player::Second);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[ui]\nwin_flourish_ms = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }

    #[test]
    fn test_reset_delay_grows_with_tallest_column() {
        let ui = UiConfig::default();
        assert_eq!(ui.reset_delay(0), Duration::from_millis(1100));
        assert_eq!(ui.reset_delay(4), Duration::from_millis(1100));
        assert_eq!(ui.reset_delay(5), Duration::from_millis(1300));
        assert_eq!(ui.reset_delay(6), Duration::from_millis(1500));
    }

    #[test]
    fn test_build_controller_seats_bot() {
        let mut config = AppConfig::default();
        config.game.seed = Some(3);
        let game = config.build_controller();
        assert_eq!(game.bot_player(), Some(Player::Second));
        assert_eq!(game.bot_name(), Some("Heuristic"));

        config.bot.enabled = false;
        assert_eq!(config.build_controller().bot_player(), None);
    }

    #[test]
    fn test_seeded_controller_is_reproducible() {
        let mut config = AppConfig::default();
        config.game.seed = Some(77);
        assert_eq!(
            config.build_controller().turn(),
            config.build_controller().turn()
        );
    }
}
