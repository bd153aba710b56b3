//! Undoable placements.
//!
//! A [`PlaceCommand`] holds the [`Snapshot`] taken just before its placement and
//! the target position. [`CommandHistory`] keeps commands on a linear stack with a
//! cursor: everything before the cursor has been applied, everything after it can
//! be redone until a new command truncates the tail.

use std::collections::VecDeque;

use thiserror::Error;
use tracing::debug;

use crate::engine::{EngineError, GameEngine, PlaceOutcome, Snapshot};
use crate::Pos;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// One placement together with the state it was made from.
#[derive(Debug, Clone)]
pub struct PlaceCommand {
    memento: Snapshot,
    pos: Pos,
}

impl PlaceCommand {
    /// Capture the engine state before placing at `pos`.
    pub fn prepare(engine: &GameEngine, pos: Pos) -> Result<Self, EngineError> {
        Ok(Self {
            memento: engine.snapshot()?,
            pos,
        })
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Place whatever animal is currently selected.
    pub fn execute(&self, engine: &mut GameEngine) -> Result<PlaceOutcome, EngineError> {
        engine.place(self.pos)
    }

    pub fn undo(&self, engine: &mut GameEngine) -> Result<(), EngineError> {
        engine.restore(&self.memento)
    }

    /// Re-select the animal that was in hand at prepare time, then place again.
    pub fn redo(&self, engine: &mut GameEngine) -> Result<PlaceOutcome, EngineError> {
        engine.select_animal(self.memento.selected_animal())?;
        self.execute(engine)
    }
}

/// Linear undo/redo stack.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    commands: VecDeque<PlaceCommand>,
    cursor: usize,
    capacity: Option<usize>,
}

impl CommandHistory {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` commands, evicting the oldest. `None` is unbounded.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            commands: VecDeque::new(),
            cursor: 0,
            capacity,
        }
    }

    /// Prepare and execute a placement, recording it on success.
    ///
    /// A rejected placement leaves both the engine and the history untouched,
    /// redo tail included.
    pub fn execute(&mut self, engine: &mut GameEngine, pos: Pos) -> Result<PlaceOutcome, HistoryError> {
        let command = PlaceCommand::prepare(engine, pos)?;
        let outcome = command.execute(engine)?;

        self.commands.truncate(self.cursor);
        self.commands.push_back(command);
        self.cursor += 1;
        if let Some(capacity) = self.capacity {
            while self.commands.len() > capacity {
                self.commands.pop_front();
                self.cursor -= 1;
            }
        }
        debug_assert_eq!(self.cursor, self.commands.len());
        Ok(outcome)
    }

    pub fn undo(&mut self, engine: &mut GameEngine) -> Result<(), HistoryError> {
        if !self.can_undo() {
            return Err(HistoryError::NothingToUndo);
        }
        let command = &self.commands[self.cursor - 1];
        command.undo(engine)?;
        self.cursor -= 1;
        debug!(pos = %command.pos(), cursor = self.cursor, "undo");
        Ok(())
    }

    pub fn redo(&mut self, engine: &mut GameEngine) -> Result<PlaceOutcome, HistoryError> {
        if !self.can_redo() {
            return Err(HistoryError::NothingToRedo);
        }
        let command = &self.commands[self.cursor];
        let outcome = command.redo(engine)?;
        self.cursor += 1;
        debug!(pos = %command.pos(), cursor = self.cursor, "redo");
        Ok(outcome)
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    /// Number of recorded commands, redo tail included.
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of commands currently applied.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.cursor = 0;
    }
}
