//! WASM bindings for habitat-core
//!
//! Provides a JavaScript-friendly API over [`Session`] for a browser front end.

use wasm_bindgen::prelude::*;

use crate::map::{MapRecord, MapStore, MemoryMapStore};
use crate::{Animal, PlaceOutcome, Pos, Session};

fn js_err<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-friendly wrapper around Session
#[wasm_bindgen]
pub struct WasmGame {
    inner: Session,
    maps: MemoryMapStore,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game host with the built-in maps and no running game
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            inner: Session::default(),
            maps: MemoryMapStore::with_builtin_maps(),
        }
    }

    /// Names of the maps available to `start`
    #[wasm_bindgen(js_name = mapNames)]
    pub fn map_names(&self) -> Result<Vec<String>, JsValue> {
        self.maps.list_map_names().map_err(js_err)
    }

    /// Start a game on a stored map
    pub fn start(&mut self, player_name: &str, map_name: &str) -> Result<(), JsValue> {
        let grid = self.maps.load_map(map_name).map_err(js_err)?;
        self.inner.new_game(player_name, grid).map_err(js_err)
    }

    /// Start a game on a map given as row-major tile codes (0 plain, 1 tree, 2 water)
    #[wasm_bindgen(js_name = startWithTiles)]
    pub fn start_with_tiles(
        &mut self,
        player_name: &str,
        map_name: &str,
        tiles: Vec<u8>,
    ) -> Result<(), JsValue> {
        let record = MapRecord {
            name: map_name.to_string(),
            tiles,
        };
        let grid = record.to_grid(self.maps.size()).map_err(js_err)?;
        self.inner.new_game(player_name, grid).map_err(js_err)
    }

    /// Select "bear", "fish" or "fox"; `undefined` clears. Returns false if refused.
    #[wasm_bindgen(js_name = selectAnimal)]
    pub fn select_animal(&mut self, animal: Option<String>) -> Result<bool, JsValue> {
        let animal = animal
            .map(|name| name.parse::<Animal>())
            .transpose()
            .map_err(js_err)?;
        self.inner.select_animal(animal).map_err(js_err)
    }

    #[wasm_bindgen(js_name = canPlace)]
    pub fn can_place(&self, x: usize, y: usize) -> bool {
        self.inner.can_place(Pos::new(x, y))
    }

    /// Place the selected animal. Returns { animal, scoreDelta, turnsAdvanced, gameOver }
    pub fn place(&mut self, x: usize, y: usize) -> Result<JsValue, JsValue> {
        let outcome = self.inner.place(Pos::new(x, y)).map_err(js_err)?;
        serde_wasm_bindgen::to_value(&WasmOutcome::from(outcome)).map_err(JsValue::from)
    }

    /// Hover preview as [{ x, y, value }], or null when the placement is illegal
    pub fn preview(&self, x: usize, y: usize) -> Result<JsValue, JsValue> {
        let cells: Option<Vec<WasmContribution>> = self.inner.preview(Pos::new(x, y)).map(|c| {
            c.into_iter()
                .map(|(pos, value)| WasmContribution {
                    x: pos.x,
                    y: pos.y,
                    value,
                })
                .collect()
        });
        serde_wasm_bindgen::to_value(&cells).map_err(JsValue::from)
    }

    pub fn undo(&mut self) -> Result<(), JsValue> {
        self.inner.undo().map_err(js_err)
    }

    pub fn redo(&mut self) -> Result<JsValue, JsValue> {
        let outcome = self.inner.redo().map_err(js_err)?;
        serde_wasm_bindgen::to_value(&WasmOutcome::from(outcome)).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_game_over()
    }

    #[wasm_bindgen(js_name = playerName)]
    pub fn player_name(&self) -> Option<String> {
        self.inner.state().map(|s| s.player_name().to_string())
    }

    pub fn turn(&self) -> u32 {
        self.inner.engine().turn()
    }

    pub fn score(&self) -> u32 {
        self.inner.state().map_or(0, |s| s.score())
    }

    #[wasm_bindgen(js_name = scoreLimit)]
    pub fn score_limit(&self) -> u32 {
        self.inner
            .state()
            .map_or(self.inner.engine().config().initial_score_limit, |s| s.score_limit())
    }

    /// Selected animal name, if any
    #[wasm_bindgen(js_name = selectedAnimal)]
    pub fn selected_animal(&self) -> Option<String> {
        self.inner
            .state()
            .and_then(|s| s.selected_animal())
            .map(|a| a.name().to_string())
    }

    /// Inventory as [bear, fish, fox]
    pub fn inventory(&self) -> Vec<u32> {
        let inventory = self
            .inner
            .state()
            .map_or(self.inner.engine().config().initial_inventory, |s| *s.inventory());
        inventory.iter().map(|(_, count)| count).collect()
    }

    /// Row-major tile codes of the current grid
    #[wasm_bindgen(js_name = tileCodes)]
    pub fn tile_codes(&self) -> Vec<u8> {
        self.inner
            .state()
            .map(|s| s.grid().tile_codes())
            .unwrap_or_default()
    }

    /// Row-major occupants: 0 empty, 1 bear, 2 fish, 3 fox
    pub fn occupants(&self) -> Vec<u8> {
        self.inner
            .state()
            .map(|s| {
                s.grid()
                    .tiles()
                    .map(|t| t.occupant().map_or(0, |a| a.index() as u8 + 1))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable placement result for JavaScript
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct WasmOutcome {
    animal: Animal,
    score_delta: u32,
    turns_advanced: u32,
    game_over: bool,
}

impl From<PlaceOutcome> for WasmOutcome {
    fn from(outcome: PlaceOutcome) -> Self {
        WasmOutcome {
            animal: outcome.animal,
            score_delta: outcome.score_delta,
            turns_advanced: outcome.turns_advanced,
            game_over: outcome.game_over,
        }
    }
}

#[derive(serde::Serialize)]
struct WasmContribution {
    x: usize,
    y: usize,
    value: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameConfig, Grid, Inventory, TileType};

    fn game_with(config: GameConfig) -> WasmGame {
        WasmGame {
            inner: Session::new(config).unwrap(),
            maps: MemoryMapStore::with_builtin_maps(),
        }
    }

    #[test]
    fn test_views_before_start_follow_engine_config() {
        let game = game_with(GameConfig {
            initial_score_limit: 12,
            initial_inventory: Inventory::new(2, 3, 4),
            ..GameConfig::default()
        });
        assert_eq!(game.score_limit(), 12);
        assert_eq!(game.inventory(), vec![2, 3, 4]);
        assert_eq!(game.turn(), 0);
        assert!(game.tile_codes().is_empty());
    }

    #[test]
    fn test_views_after_placement() {
        let mut game = game_with(GameConfig::default());
        game.inner
            .new_game("web", Grid::filled("plain", 8, TileType::Plain))
            .unwrap();
        assert!(game.select_animal(Some("bear".into())).unwrap());
        game.inner.place(Pos::new(4, 4)).unwrap();

        assert_eq!(game.score(), 6);
        assert_eq!(game.inventory(), vec![0, 0, 0]);
        assert_eq!(game.occupants()[4 * 8 + 4], 1);
        assert!(game.is_game_over());
        assert!(game.can_undo());
    }
}
