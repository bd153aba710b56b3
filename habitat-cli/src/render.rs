//! Plain-text rendering of a game for the terminal.

use habitat_core::{Animal, Contributions, GameState, Grid, TileType};

// ============================================================================
// Glyphs
// ============================================================================

fn tile_glyph(tile_type: TileType) -> char {
    match tile_type {
        TileType::Plain => '.',
        TileType::Tree => '^',
        TileType::Water => '~',
    }
}

fn animal_glyph(animal: Animal) -> char {
    match animal {
        Animal::Bear => 'B',
        Animal::Fish => 'F',
        Animal::Fox => 'X',
    }
}

/// Grid with column and row indices. Empty tiles show their terrain,
/// occupied ones the animal.
pub fn grid(grid: &Grid) -> String {
    let mut out = String::from("   ");
    for x in 0..grid.size() {
        out.push_str(&format!("{} ", x % 10));
    }
    out.push('\n');

    for (y, row) in grid.rows().enumerate() {
        out.push_str(&format!("{:>2} ", y));
        for tile in row {
            let glyph = tile.occupant().map_or_else(|| tile_glyph(tile.tile_type()), animal_glyph);
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// One-line summary of counters and selection.
pub fn status(state: &GameState) -> String {
    let inventory: Vec<String> = state
        .inventory()
        .iter()
        .map(|(animal, count)| format!("{animal} {count}"))
        .collect();
    let selected = state
        .selected_animal()
        .map_or_else(|| "none".to_string(), |a| a.to_string());
    format!(
        "{} | turn {} | score {}/{} | {} | selected: {}",
        state.player_name(),
        state.turn(),
        state.score(),
        state.score_limit(),
        inventory.join(" "),
        selected
    )
}

pub fn game(state: &GameState) -> String {
    format!("{}\n{}", grid(state.grid()), status(state))
}

/// Per-tile breakdown followed by the resulting score.
pub fn contributions(contributions: &Contributions) -> String {
    let mut out = String::new();
    for (pos, value) in contributions {
        out.push_str(&format!("  {pos}: {value:+}\n"));
    }
    let raw: i32 = contributions.values().sum();
    out.push_str(&format!("  total: {}", raw.max(0)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use habitat_core::{GameConfig, GameEngine, Inventory, Pos};

    #[test]
    fn test_grid_glyphs() {
        let mut g = Grid::create("t", 3, |pos| TileType::ALL[pos.x]);
        g.set_occupant(Pos::new(1, 2), Animal::Fox).unwrap();
        let text = grid(&g);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "   0 1 2 ");
        assert_eq!(lines[1], " 0 . ^ ~ ");
        assert_eq!(lines[3], " 2 . X ~ ");
    }

    #[test]
    fn test_contributions_total_floors_at_zero() {
        let mut c = Contributions::new();
        c.insert(Pos::new(0, 0), 6);
        c.insert(Pos::new(1, 0), -10);
        let text = contributions(&c);
        assert!(text.contains("(0, 0): +6"));
        assert!(text.contains("(1, 0): -10"));
        assert!(text.ends_with("total: 0"));
    }

    #[test]
    fn test_status_lists_inventory_in_animal_order() {
        let mut engine = GameEngine::with_config(GameConfig {
            initial_inventory: Inventory::new(2, 0, 5),
            ..GameConfig::default()
        })
        .unwrap();
        engine
            .create_game("tester", Grid::filled("plain", 8, TileType::Plain))
            .unwrap();
        engine.select_animal(Some(Animal::Fox)).unwrap();
        assert_eq!(
            status(engine.state().unwrap()),
            "tester | turn 1 | score 0/8 | bear 2 fish 0 fox 5 | selected: fox"
        );
    }
}
