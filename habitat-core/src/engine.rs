//! Game state, placement rules, scoring and turn progression.
//!
//! [`GameEngine`] owns the single [`GameState`] of a running game. Every mutation
//! goes through it: `create_game`, `select_animal`, `place` and `restore`.
//! Queries (`can_place`, `compute_score`, `score_contributions`, `is_game_over`)
//! never mutate and can be called as often as a hover preview needs.

use std::fmt;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, GameConfig};
use crate::grid::{Grid, GridError};
use crate::rules::{Contributions, ScoreRule};
use crate::{Animal, Inventory, Pos};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no game has been started")]
    NoGame,
    #[error("cannot place the selected animal on tile {x},{y}")]
    IllegalPlacement { x: usize, y: usize },
    #[error("player name must not be empty")]
    EmptyPlayerName,
    #[error("grid is {actual}x{actual}, expected {expected}x{expected}")]
    GridSize { expected: usize, actual: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Notifications for a presentation layer.
pub trait GameObserver {
    /// The turn advanced; called once per threshold crossed.
    fn on_turn_advanced(&mut self, _turn: u32, _score_limit: u32) {}

    /// No animal left in the inventory has a legal tile.
    fn on_game_over(&mut self, _state: &GameState) {}
}

/// Result of a successful placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceOutcome {
    pub animal: Animal,
    pub score_delta: u32,
    pub turns_advanced: u32,
    pub game_over: bool,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Everything that changes during a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    player_name: String,
    turn: u32,
    score: u32,
    score_limit: u32,
    selected: Option<Animal>,
    inventory: Inventory,
    grid: Grid,
}

impl GameState {
    fn new(player_name: String, grid: Grid, config: &GameConfig) -> Self {
        Self {
            player_name,
            turn: 1,
            score: 0,
            score_limit: config.initial_score_limit,
            selected: None,
            inventory: config.initial_inventory,
            grid,
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn score_limit(&self) -> u32 {
        self.score_limit
    }

    pub fn selected_animal(&self) -> Option<Animal> {
        self.selected
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// True if the selected animal may go on the tile at `pos`.
    pub fn can_place(&self, pos: Pos) -> bool {
        let Some(tile) = self.grid.get(pos) else {
            return false;
        };
        if !tile.is_empty() {
            return false;
        }
        match self.selected {
            None => false,
            Some(animal) => animal.can_live_on(tile.tile_type()),
        }
    }

    pub fn compute_score(&self, pos: Pos, animal: Animal) -> Result<u32, GridError> {
        ScoreRule::of(animal).score(&self.grid, pos)
    }

    pub fn score_contributions(&self, pos: Pos, animal: Animal) -> Result<Contributions, GridError> {
        ScoreRule::of(animal).contributions(&self.grid, pos)
    }

    /// Check if no animal with remaining inventory has a legal tile left.
    pub fn is_game_over(&self) -> bool {
        let bears = self.inventory.bear;
        let fish = self.inventory.fish;
        let foxes = self.inventory.fox;
        if self.inventory.is_empty() {
            return true;
        }

        let mut ground_empty = false;
        let mut water_empty = false;
        for tile in self.grid.tiles().filter(|t| t.is_empty()) {
            if tile.tile_type().is_water() {
                water_empty = true;
            } else {
                ground_empty = true;
            }
            if ground_empty && water_empty {
                break;
            }
        }

        (!ground_empty && (!water_empty || fish == 0))
            || (!water_empty && bears == 0 && foxes == 0)
    }

    /// Advance turns until the score is back under the limit.
    /// Returns `(turn, score_limit)` for every threshold crossed.
    fn advance_turn(&mut self, step: u32) -> Vec<(u32, u32)> {
        debug_assert!(step > 0);
        let mut crossed = Vec::new();
        while self.score >= self.score_limit {
            self.turn += 1;
            self.inventory.grant_all(1);
            self.score_limit += step * self.turn;
            crossed.push((self.turn, self.score_limit));
        }
        debug_assert!(self.score < self.score_limit);
        crossed
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            turn: self.turn,
            score: self.score,
            score_limit: self.score_limit,
            selected: self.selected,
            inventory: self.inventory,
            grid: self.grid.clone(),
        }
    }
}

/// Immutable copy of the mutable parts of a game, taken before a placement.
///
/// Restoring does not touch the current selection except to clear it when the
/// restored inventory has none of that animal left; `selected` is kept so a
/// redo can re-select what was in hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    turn: u32,
    score: u32,
    score_limit: u32,
    selected: Option<Animal>,
    inventory: Inventory,
    grid: Grid,
}

impl Snapshot {
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn score_limit(&self) -> u32 {
        self.score_limit
    }

    pub fn selected_animal(&self) -> Option<Animal> {
        self.selected
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Owner of the running game.
pub struct GameEngine {
    config: GameConfig,
    state: Option<GameState>,
    observer: Option<Box<dyn GameObserver>>,
}

impl GameEngine {
    /// Engine with the reference configuration.
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
            state: None,
            observer: None,
        }
    }

    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: None,
            observer: None,
        })
    }

    pub fn set_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observer = Some(observer);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current game, if one was started.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    fn state_mut(&mut self) -> Result<&mut GameState, EngineError> {
        self.state.as_mut().ok_or(EngineError::NoGame)
    }

    fn current(&self) -> Result<&GameState, EngineError> {
        self.state.as_ref().ok_or(EngineError::NoGame)
    }

    /// Turn number; 0 before any game exists.
    pub fn turn(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.turn)
    }

    /// Start a new game on `grid`, discarding any previous one.
    pub fn create_game(&mut self, player_name: &str, grid: Grid) -> Result<(), EngineError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(EngineError::EmptyPlayerName);
        }
        if grid.size() != self.config.grid_size {
            return Err(EngineError::GridSize {
                expected: self.config.grid_size,
                actual: grid.size(),
            });
        }
        info!(player = player_name, map = grid.name(), "new game");
        self.state = Some(GameState::new(player_name.to_string(), grid, &self.config));
        Ok(())
    }

    pub fn set_player_name(&mut self, player_name: &str) -> Result<(), EngineError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(EngineError::EmptyPlayerName);
        }
        self.state_mut()?.player_name = player_name.to_string();
        Ok(())
    }

    /// Change the selected animal. Selecting an animal with no inventory left
    /// is ignored and returns `Ok(false)`; `None` always clears.
    pub fn select_animal(&mut self, animal: Option<Animal>) -> Result<bool, EngineError> {
        let state = self.state_mut()?;
        if let Some(animal) = animal {
            if state.inventory[animal] == 0 {
                return Ok(false);
            }
        }
        state.selected = animal;
        Ok(true)
    }

    pub fn can_place(&self, pos: Pos) -> bool {
        self.state.as_ref().is_some_and(|s| s.can_place(pos))
    }

    pub fn compute_score(&self, pos: Pos, animal: Animal) -> Result<u32, EngineError> {
        Ok(self.current()?.compute_score(pos, animal)?)
    }

    pub fn score_contributions(&self, pos: Pos, animal: Animal) -> Result<Contributions, EngineError> {
        Ok(self.current()?.score_contributions(pos, animal)?)
    }

    /// Contributions of the selected animal at `pos`, only when it could be placed there.
    pub fn preview(&self, pos: Pos) -> Option<Contributions> {
        let state = self.state.as_ref()?;
        if !state.can_place(pos) {
            return None;
        }
        state.score_contributions(pos, state.selected?).ok()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.as_ref().is_some_and(GameState::is_game_over)
    }

    /// Place the selected animal on `pos`.
    ///
    /// Fails without touching the state when the placement is illegal.
    pub fn place(&mut self, pos: Pos) -> Result<PlaceOutcome, EngineError> {
        let step = self.config.score_limit_step;
        let state = self.state.as_mut().ok_or(EngineError::NoGame)?;
        let animal = match state.selected {
            Some(animal) if state.can_place(pos) => animal,
            _ => return Err(EngineError::IllegalPlacement { x: pos.x, y: pos.y }),
        };

        let score_delta = state.compute_score(pos, animal)?;
        state.score += score_delta;
        let crossed = state.advance_turn(step);
        let turns_advanced = crossed.len() as u32;

        state.grid.set_occupant(pos, animal)?;
        let taken = state.inventory.take(animal);
        debug_assert!(taken, "selected animal had no inventory");
        if state.inventory[animal] == 0 {
            state.selected = None;
        }
        let game_over = state.is_game_over();

        debug!(%animal, x = pos.x, y = pos.y, score_delta, score = state.score, "placed");
        for &(turn, score_limit) in &crossed {
            info!(turn, score_limit, "turn advanced");
            if let Some(observer) = self.observer.as_mut() {
                observer.on_turn_advanced(turn, score_limit);
            }
        }
        if game_over {
            info!(player = %state.player_name, score = state.score, turn = state.turn, "game over");
            if let Some(observer) = self.observer.as_mut() {
                observer.on_game_over(state);
            }
        }

        Ok(PlaceOutcome {
            animal,
            score_delta,
            turns_advanced,
            game_over,
        })
    }

    /// Capture the mutable parts of the current game.
    pub fn snapshot(&self) -> Result<Snapshot, EngineError> {
        Ok(self.current()?.snapshot())
    }

    /// Replace turn, score, limit, inventory and grid with the snapshot's.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), EngineError> {
        let state = self.state_mut()?;
        state.turn = snapshot.turn;
        state.score = snapshot.score;
        state.score_limit = snapshot.score_limit;
        state.inventory = snapshot.inventory;
        state.grid = snapshot.grid.clone();
        if let Some(animal) = state.selected {
            if state.inventory[animal] == 0 {
                state.selected = None;
            }
        }
        Ok(())
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
