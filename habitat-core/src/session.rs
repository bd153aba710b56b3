//! One running game: engine plus its undo history.

use crate::config::{ConfigError, GameConfig};
use crate::engine::{EngineError, GameEngine, GameObserver, GameState, PlaceOutcome};
use crate::grid::Grid;
use crate::history::{CommandHistory, HistoryError};
use crate::rules::Contributions;
use crate::{Animal, Pos};

/// Entry point for a presentation layer. Every placement made through a
/// session is undoable.
#[derive(Debug)]
pub struct Session {
    engine: GameEngine,
    history: CommandHistory,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let history = CommandHistory::with_capacity(config.history_capacity);
        Ok(Self {
            engine: GameEngine::with_config(config)?,
            history,
        })
    }

    pub fn set_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.engine.set_observer(observer);
    }

    /// Start a new game and forget the previous history.
    pub fn new_game(&mut self, player_name: &str, grid: Grid) -> Result<(), EngineError> {
        self.engine.create_game(player_name, grid)?;
        self.history.clear();
        Ok(())
    }

    #[inline]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    #[inline]
    pub fn state(&self) -> Option<&GameState> {
        self.engine.state()
    }

    pub fn set_player_name(&mut self, player_name: &str) -> Result<(), EngineError> {
        self.engine.set_player_name(player_name)
    }

    pub fn select_animal(&mut self, animal: Option<Animal>) -> Result<bool, EngineError> {
        self.engine.select_animal(animal)
    }

    pub fn can_place(&self, pos: Pos) -> bool {
        self.engine.can_place(pos)
    }

    pub fn preview(&self, pos: Pos) -> Option<Contributions> {
        self.engine.preview(pos)
    }

    pub fn is_game_over(&self) -> bool {
        self.engine.is_game_over()
    }

    pub fn place(&mut self, pos: Pos) -> Result<PlaceOutcome, HistoryError> {
        self.history.execute(&mut self.engine, pos)
    }

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        self.history.undo(&mut self.engine)
    }

    pub fn redo(&mut self) -> Result<PlaceOutcome, HistoryError> {
        self.history.redo(&mut self.engine)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn cursor(&self) -> usize {
        self.history.cursor()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            engine: GameEngine::new(),
            history: CommandHistory::new(),
        }
    }
}
