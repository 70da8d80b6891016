use std::sync::mpsc::Sender;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};

use crate::ai::Agent;
use crate::error::{GameError, ResetError};

use super::board::{Board, Cell, Position, COLS, ROWS};
use super::win::{find_winner, Segment};
use super::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner { player: Player, segment: Segment },
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Active,
    /// Moves are held off until [`GameController::resume`]. The end-of-game
    /// presentation does not use this state: a won or tied game rejects moves
    /// on its own, and the `can_reset` latch gates the reset until the
    /// presentation is acknowledged.
    Paused,
    Won { winner: Player, segment: Segment },
    Tied,
}

impl GameState {
    /// Won or tied
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameState::Won { .. } | GameState::Tied)
    }

    fn label(&self) -> &'static str {
        match self {
            GameState::Active => "active",
            GameState::Paused => "paused",
            GameState::Won { .. } => "won",
            GameState::Tied => "tied",
        }
    }
}

/// An accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub position: Position,
    pub player: Player,
    pub outcome: Option<GameOutcome>,
}

/// Callbacks fired by [`GameController`]. All methods default to no-ops.
pub trait GameObserver {
    fn on_move_applied(&mut self, _position: Position, _player: Player) {}
    fn on_game_won(&mut self, _segment: &Segment, _player: Player) {}
    fn on_game_tied(&mut self) {}
    fn on_reset_ready(&mut self) {}
}

/// Controller notifications as values, for observers that forward them over
/// a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    MoveApplied { position: Position, player: Player },
    GameWon { segment: Segment, player: Player },
    GameTied,
    ResetReady,
}

impl GameObserver for Sender<GameEvent> {
    fn on_move_applied(&mut self, position: Position, player: Player) {
        let _ = self.send(GameEvent::MoveApplied { position, player });
    }

    fn on_game_won(&mut self, segment: &Segment, player: Player) {
        let _ = self.send(GameEvent::GameWon {
            segment: *segment,
            player,
        });
    }

    fn on_game_tied(&mut self) {
        let _ = self.send(GameEvent::GameTied);
    }

    fn on_reset_ready(&mut self) {
        let _ = self.send(GameEvent::ResetReady);
    }
}

struct BotSeat {
    player: Player,
    agent: Box<dyn Agent>,
}

/// Turn and state machine for one board.
///
/// The controller is the only writer of the board, the turn and the game
/// state. Moves are accepted only while `Active`; after a win or tie a reset
/// is accepted only once the presentation layer has acknowledged the end of
/// the game.
pub struct GameController<R = StdRng> {
    board: Board,
    turn: Player,
    state: GameState,
    can_reset: bool,
    rng: R,
    bot: Option<BotSeat>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl GameController<StdRng> {
    pub fn new() -> Self {
        GameController::with_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        GameController::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for GameController<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GameController<R> {
    /// Fresh game with a randomly chosen starting player.
    pub fn with_rng(mut rng: R) -> Self {
        let turn = Player::random(&mut rng);
        GameController::with_first_player(turn, rng)
    }

    /// Fresh game where `first` moves first. Later resets pick at random.
    pub fn with_first_player(first: Player, rng: R) -> Self {
        GameController {
            board: Board::new(),
            turn: first,
            state: GameState::Active,
            can_reset: false,
            rng,
            bot: None,
            observers: Vec::new(),
        }
    }

    /// Let `agent` play as `player`.
    pub fn with_bot(mut self, player: Player, agent: Box<dyn Agent>) -> Self {
        info!(player = player.name(), agent = agent.name(), "bot seated");
        self.bot = Some(BotSeat { player, agent });
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_snapshot(&self) -> [[Cell; COLS]; ROWS] {
        self.board.snapshot()
    }

    /// Player whose move is accepted next (the winner once the game is won)
    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn move_count(&self) -> usize {
        self.board.move_count()
    }

    pub fn can_reset(&self) -> bool {
        self.can_reset
    }

    /// The game is over and the end-of-game presentation has finished
    pub fn awaiting_reset(&self) -> bool {
        self.state.is_terminal() && self.can_reset
    }

    pub fn bot_player(&self) -> Option<Player> {
        self.bot.as_ref().map(|seat| seat.player)
    }

    pub fn bot_name(&self) -> Option<&str> {
        self.bot.as_ref().map(|seat| seat.agent.name())
    }

    /// Whether the scheduler should ask for a bot move now
    pub fn is_bot_turn(&self) -> bool {
        self.state == GameState::Active && self.bot_player() == Some(self.turn)
    }

    /// Drop the current player's piece into `column`.
    ///
    /// Rejections leave every part of the game untouched.
    pub fn request_move(&mut self, column: usize) -> Result<Placement, GameError> {
        let result = self.apply_move(column);
        if let Err(err) = &result {
            debug!(column, %err, "move rejected");
        }
        result
    }

    /// Ask the seated bot for its move and apply it.
    pub fn request_bot_move(&mut self) -> Result<Placement, GameError> {
        if self.state != GameState::Active {
            return Err(GameError::IllegalStateTransition {
                state: self.state.label(),
            });
        }
        if !self.is_bot_turn() {
            return Err(GameError::NotBotTurn);
        }

        let choice = match self.bot.as_mut() {
            Some(seat) => seat.agent.select_move(&self.board, seat.player),
            None => None,
        };
        let Some(target) = choice else {
            error!("bot found no move on a board that is still active");
            return Err(GameError::NoBotMove);
        };
        self.apply_move(target.col())
    }

    fn apply_move(&mut self, column: usize) -> Result<Placement, GameError> {
        if self.state != GameState::Active {
            return Err(GameError::IllegalStateTransition {
                state: self.state.label(),
            });
        }

        let target = self
            .board
            .drop_target(column)?
            .ok_or(GameError::ColumnFull(column))?;
        let player = self.turn;

        if let Err(err) = self.board.place(target, player) {
            error!(%err, "drop target rejected by board");
            debug_assert!(false, "{err}");
            return Err(err);
        }
        debug!(player = player.name(), position = %target, moves = self.board.move_count(), "move applied");
        for observer in &mut self.observers {
            observer.on_move_applied(target, player);
        }

        let outcome = if let Some(segment) = find_winner(&self.board, target) {
            info!(winner = player.name(), %segment, "game won");
            self.state = GameState::Won {
                winner: player,
                segment,
            };
            for observer in &mut self.observers {
                observer.on_game_won(&segment, player);
            }
            Some(GameOutcome::Winner { player, segment })
        } else if self.board.is_full() {
            info!("game tied");
            self.state = GameState::Tied;
            for observer in &mut self.observers {
                observer.on_game_tied();
            }
            Some(GameOutcome::Draw)
        } else {
            self.turn = player.other();
            None
        };

        if outcome.is_some() {
            self.can_reset = false;
        }

        Ok(Placement {
            position: target,
            player,
            outcome,
        })
    }

    /// Stop accepting moves. Only an active game can be paused.
    pub fn pause(&mut self) -> bool {
        if self.state != GameState::Active {
            return false;
        }
        self.state = GameState::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != GameState::Paused {
            return false;
        }
        self.state = GameState::Active;
        true
    }

    /// Called by the presentation layer once its end-of-game display has
    /// finished. Sets the reset latch; returns false if the game is not over.
    pub fn acknowledge_game_over(&mut self) -> bool {
        if !self.state.is_terminal() {
            return false;
        }
        if !self.can_reset {
            self.can_reset = true;
            for observer in &mut self.observers {
                observer.on_reset_ready();
            }
        }
        true
    }

    /// Start a new game on a cleared board with a random starting player.
    pub fn request_reset(&mut self) -> Result<(), ResetError> {
        if !self.state.is_terminal() {
            warn!(state = self.state.label(), "reset requested mid-game");
            return Err(ResetError::GameInProgress);
        }
        if !self.can_reset {
            warn!("reset requested before end-of-game acknowledgement");
            return Err(ResetError::NotReady);
        }

        self.board.clear();
        self.turn = Player::random(&mut self.rng);
        self.state = GameState::Active;
        self.can_reset = false;
        info!(first = self.turn.name(), "game reset");
        Ok(())
    }
}
