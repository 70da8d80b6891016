use std::io;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, info};

use crate::config::UiConfig;
use crate::error::{GameError, ResetError};
use crate::game::{GameController, GameEvent, GameState, COLS};

/// Terminal front end. Owns every timer: the bot's thinking pause, the
/// end-of-game flourish that gates the reset latch, and the clearing delay.
pub struct App {
    game: GameController,
    events: Receiver<GameEvent>,
    ui: UiConfig,
    think_delay: Duration,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    bot_due: Option<Instant>,
    ack_due: Option<Instant>,
    reset_due: Option<Instant>,
}

impl App {
    pub fn new(mut game: GameController, ui: UiConfig, think_delay: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        game.subscribe(Box::new(tx));
        App {
            game,
            events: rx,
            ui,
            think_delay,
            selected_column: COLS / 2,
            should_quit: false,
            message: None,
            bot_due: None,
            ack_due: None,
            reset_due: None,
        }
    }

    pub fn game(&self) -> &GameController {
        &self.game
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.tick(Instant::now());
            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, Instant::now());
            }
        }
        Ok(())
    }

    /// Advance timers and react to controller events.
    pub fn tick(&mut self, now: Instant) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                GameEvent::MoveApplied { .. } => {}
                GameEvent::GameWon { .. } => {
                    self.message = Some(self.result_text());
                    self.ack_due = Some(now + self.ui.win_flourish());
                }
                GameEvent::GameTied => {
                    self.message = Some(self.result_text());
                    self.ack_due = Some(now);
                }
                GameEvent::ResetReady => {
                    self.message = Some(format!("{} Press space to play again.", self.result_text()));
                }
            }
        }

        if let Some(due) = self.ack_due {
            if now >= due {
                self.ack_due = None;
                self.game.acknowledge_game_over();
            }
        }

        if let Some(due) = self.reset_due {
            if now >= due {
                self.reset_due = None;
                match self.game.request_reset() {
                    Ok(()) => {
                        self.message = Some(format!("{} starts.", self.game.turn().name()));
                    }
                    Err(err) => debug!(%err, "scheduled reset refused"),
                }
            }
        }

        if self.game.is_bot_turn() {
            match self.bot_due {
                None => self.bot_due = Some(now + self.think_delay),
                Some(due) if now >= due => {
                    self.bot_due = None;
                    if let Err(err) = self.game.request_bot_move() {
                        self.message = Some(format!("Bot move failed: {err}"));
                    }
                }
                Some(_) => {}
            }
        } else {
            self.bot_due = None;
        }
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.selected_column = c as usize - '1' as usize;
                self.drop_piece();
            }
            KeyCode::Enter | KeyCode::Down => {
                self.drop_piece();
            }
            KeyCode::Char(' ') | KeyCode::Char('r') => {
                self.schedule_reset(now);
            }
            KeyCode::Char('p') => {
                self.toggle_pause();
            }
            _ => {}
        }
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        if self.game.is_bot_turn() {
            self.message = Some("Wait for the bot to move.".to_string());
            return;
        }

        match self.game.request_move(self.selected_column) {
            Ok(_) => {
                if !self.game.state().is_terminal() {
                    self.message = None;
                }
            }
            Err(GameError::ColumnFull(_)) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(GameError::IllegalStateTransition { .. }) if self.game.awaiting_reset() => {
                self.message = Some(format!("{} Press space to play again.", self.result_text()));
            }
            Err(GameError::IllegalStateTransition { .. }) if self.game.state().is_terminal() => {
                self.message = Some(self.result_text());
            }
            Err(err) => {
                self.message = Some(err.to_string());
            }
        }
    }

    fn result_text(&self) -> String {
        match self.game.state() {
            GameState::Won { winner, .. } => format!("{} wins!", winner.name()),
            GameState::Tied => "It's a draw!".to_string(),
            GameState::Active | GameState::Paused => String::new(),
        }
    }

    fn toggle_pause(&mut self) {
        if self.game.pause() {
            self.message = Some("Paused. Press p to resume.".to_string());
        } else if self.game.resume() {
            self.message = None;
        }
    }

    fn schedule_reset(&mut self, now: Instant) {
        if self.reset_due.is_some() {
            return;
        }
        if self.game.awaiting_reset() {
            let delay = self.ui.reset_delay(self.game.board().tallest_column_height());
            info!(delay_ms = delay.as_millis() as u64, "reset scheduled");
            self.reset_due = Some(now + delay);
            self.message = Some("Clearing the board...".to_string());
        } else {
            let reason = if self.game.state().is_terminal() {
                ResetError::NotReady
            } else {
                ResetError::GameInProgress
            };
            debug!(%reason, "reset key ignored");
        }
    }

    /// Whether a clearing animation is in progress
    pub fn is_clearing(&self) -> bool {
        self.reset_due.is_some()
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(frame, self);
    }
}
