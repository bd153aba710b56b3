//! End-to-end game scenarios
//!
//! Drives whole games through the public API:
//! - Reference scoring and turn-advance scenarios
//! - Map wire records loaded from JSON
//! - Random legal games checking score, inventory and undo/redo invariants

use habitat_core::{
    Animal, EngineError, GameConfig, GameEngine, Grid, HistoryError, Inventory, MapRecord,
    MapStore, MapStoreError, MemoryMapStore, Pos, Session, TileType,
};
use rand::prelude::*;

/// Every (animal, pos) pair that could be placed right now.
fn legal_moves(session: &mut Session) -> Vec<(Animal, Pos)> {
    let Some(state) = session.state() else {
        return vec![];
    };
    let inventory = *state.inventory();
    let positions: Vec<Pos> = state.grid().tiles().map(|t| t.pos()).collect();
    let selected = state.selected_animal();

    let mut moves = Vec::new();
    for animal in Animal::ALL {
        if inventory[animal] == 0 {
            continue;
        }
        session.select_animal(Some(animal)).unwrap();
        moves.extend(positions.iter().filter(|&&p| session.can_place(p)).map(|&p| (animal, p)));
    }
    session.select_animal(selected).unwrap();
    moves
}

#[test]
fn test_bear_on_all_plain_grid() {
    let mut engine = GameEngine::new();
    engine
        .create_game("plain", Grid::filled("plain", 8, TileType::Plain))
        .unwrap();
    engine.select_animal(Some(Animal::Bear)).unwrap();
    assert_eq!(engine.compute_score(Pos::new(4, 4), Animal::Bear), Ok(6));

    let outcome = engine.place(Pos::new(4, 4)).unwrap();
    assert_eq!(outcome.score_delta, 6);
    let state = engine.state().unwrap();
    assert_eq!(state.score(), 6);
    assert_eq!(state.turn(), 1);
    assert_eq!(state.score_limit(), 8);
}

#[test]
fn test_placement_scoring_exactly_the_limit() {
    // bear at (0,0): one empty tree (+4) and one fox (-2), water elsewhere
    let mut grid = Grid::create("edge", 8, |pos| match (pos.x, pos.y) {
        (0, 0) | (0, 1) => TileType::Plain,
        (1, 0) => TileType::Tree,
        _ => TileType::Water,
    });
    grid.set_occupant(Pos::new(0, 1), Animal::Fox).unwrap();

    let mut engine = GameEngine::new();
    engine.create_game("edge", grid).unwrap();
    engine.select_animal(Some(Animal::Bear)).unwrap();
    let outcome = engine.place(Pos::new(0, 0)).unwrap();

    assert_eq!(outcome.score_delta, 8);
    assert_eq!(outcome.turns_advanced, 1);
    let state = engine.state().unwrap();
    assert_eq!(state.turn(), 2);
    assert_eq!(state.score_limit(), 24);
    // {2,1,1} after the advance, then the placed bear is taken
    assert_eq!(*state.inventory(), Inventory::new(1, 1, 1));
}

#[test]
fn test_game_over_with_only_water_left_for_fox() {
    let mut grid = Grid::create("full", 8, |pos| {
        if pos == Pos::new(5, 2) {
            TileType::Water
        } else {
            TileType::Tree
        }
    });
    let positions: Vec<Pos> = grid.tiles().map(|t| t.pos()).collect();
    for pos in positions {
        if pos != Pos::new(5, 2) {
            grid.set_occupant(pos, Animal::Bear).unwrap();
        }
    }
    let config = GameConfig {
        initial_inventory: Inventory::new(0, 0, 1),
        ..GameConfig::default()
    };
    let mut engine = GameEngine::with_config(config).unwrap();
    engine.create_game("fox", grid).unwrap();
    assert!(engine.is_game_over());

    engine.select_animal(Some(Animal::Fox)).unwrap();
    assert!(!engine.can_place(Pos::new(5, 2)));
    assert_eq!(
        engine.place(Pos::new(5, 2)),
        Err(EngineError::IllegalPlacement { x: 5, y: 2 })
    );
}

#[test]
fn test_maps_from_json_fixture() {
    let forest = MapRecord {
        name: "Fixture-Forest".into(),
        tiles: vec![1; 64],
    };
    let lake = MapRecord {
        name: "Fixture-Lake".into(),
        tiles: vec![2; 64],
    };
    let json = serde_json::to_string(&vec![forest, lake]).unwrap();
    let mut store = MemoryMapStore::from_json(8, &json).unwrap();
    assert_eq!(
        store.list_map_names().unwrap(),
        vec!["Fixture-Forest".to_string(), "Fixture-Lake".to_string()]
    );

    let lake = store.load_map("Fixture-Lake").unwrap();
    assert!(lake.tiles().all(|t| t.tile_type() == TileType::Water));

    assert!(matches!(
        store.save_map(&lake),
        Err(MapStoreError::AlreadyExists(_))
    ));
    assert!(matches!(
        MemoryMapStore::from_json(8, r#"[{"name":"short","tiles":[0,1,2]}]"#),
        Err(MapStoreError::Invalid(_))
    ));
}

#[test]
fn test_builtin_map_playthrough() {
    let store = MemoryMapStore::with_builtin_maps();
    for name in store.list_map_names().unwrap() {
        let mut session = Session::default();
        session.new_game("tour", store.load_map(&name).unwrap()).unwrap();

        let mut placements = 0;
        loop {
            let moves = legal_moves(&mut session);
            assert_eq!(moves.is_empty(), session.is_game_over(), "map {name}");
            let Some(&(animal, pos)) = moves.first() else {
                break;
            };
            session.select_animal(Some(animal)).unwrap();
            session.place(pos).unwrap();
            placements += 1;
        }
        assert!(placements >= 1, "map {name}");
        assert_eq!(session.history_len(), placements);
    }
}

#[test]
fn test_random_games_fuzz() {
    let mut rng = rand::rng();

    for game in 0..30 {
        let grid = Grid::random(format!("fuzz-{game}"), 8, &mut rng);
        let mut session = Session::default();
        session.new_game("fuzz", grid).unwrap();
        let mut expected_score = 0u32;

        loop {
            let moves = legal_moves(&mut session);
            assert_eq!(moves.is_empty(), session.is_game_over());
            if moves.is_empty() {
                break;
            }
            let (animal, pos) = moves[rng.random_range(0..moves.len())];
            session.select_animal(Some(animal)).unwrap();

            let before = session.engine().snapshot().unwrap();
            let preview = session.preview(pos).unwrap();
            let outcome = session.place(pos).unwrap();

            // score matches the previewed breakdown, floored at zero
            let raw: i32 = preview.values().sum();
            assert_eq!(outcome.score_delta, raw.max(0) as u32);
            expected_score += outcome.score_delta;

            let state = session.state().unwrap();
            assert_eq!(state.score(), expected_score);
            assert!(state.score() < state.score_limit());
            assert_eq!(state.turn(), before.turn() + outcome.turns_advanced);
            assert_eq!(
                state.inventory().total() + 1,
                before.inventory().total() + 3 * outcome.turns_advanced
            );
            assert_eq!(state.grid().tile_at(pos).unwrap().occupant(), Some(animal));
            let after = session.engine().snapshot().unwrap();

            // place -> undo -> redo lands on the same state
            session.undo().unwrap();
            let undone = session.engine().snapshot().unwrap();
            assert_eq!(undone.score(), before.score());
            assert_eq!(undone.turn(), before.turn());
            assert_eq!(undone.score_limit(), before.score_limit());
            assert_eq!(undone.inventory(), before.inventory());
            assert_eq!(undone.grid(), before.grid());

            let redone = session.redo().unwrap();
            assert_eq!(redone, outcome);
            let now = session.engine().snapshot().unwrap();
            assert_eq!(now.score(), after.score());
            assert_eq!(now.turn(), after.turn());
            assert_eq!(now.score_limit(), after.score_limit());
            assert_eq!(now.inventory(), after.inventory());
            assert_eq!(now.grid(), after.grid());
        }

        // unwind the whole game
        while session.can_undo() {
            session.undo().unwrap();
        }
        let state = session.state().unwrap();
        assert_eq!(state.score(), 0);
        assert_eq!(state.turn(), 1);
        assert_eq!(state.grid().occupied_count(), 0);
        assert_eq!(session.undo(), Err(HistoryError::NothingToUndo));
    }
}
