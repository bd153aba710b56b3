//! Static scoring rules, one per animal.
//!
//! ```text
//! Animal | points | radius | tile weights      | animal weights
//! BEAR   |   6    |   2    | TREE +4           | BEAR -5, FISH +7, FOX -2
//! FISH   |   8    |   1    | WATER +5          | FISH -2
//! FOX    |   5    |   1    | PLAIN +7          | FOX -2
//! ```

use std::collections::BTreeMap;

use crate::grid::{Grid, GridError, Tile};
use crate::{Animal, Pos, TileType};

/// Signed per-tile score breakdown, keyed by tile position.
pub type Contributions = BTreeMap<Pos, i32>;

/// Scoring configuration for one animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRule {
    /// Flat bonus for placing on any legal tile.
    pub points: i32,
    /// Chebyshev radius of the neighbourhood examined.
    pub radius: usize,
    /// Weight of an empty neighbour, indexed by tile code.
    pub tiles: [i32; 3],
    /// Weight of an occupied neighbour, indexed by [`Animal::index`].
    pub animals: [i32; 3],
}

const SCORE_RULES: [ScoreRule; 3] = [
    // Bear
    ScoreRule {
        points: 6,
        radius: 2,
        tiles: [0, 4, 0],
        animals: [-5, 7, -2],
    },
    // Fish
    ScoreRule {
        points: 8,
        radius: 1,
        tiles: [0, 0, 5],
        animals: [0, -2, 0],
    },
    // Fox
    ScoreRule {
        points: 5,
        radius: 1,
        tiles: [7, 0, 0],
        animals: [0, 0, -2],
    },
];

impl ScoreRule {
    /// Look up the rule for an animal.
    #[inline]
    pub fn of(animal: Animal) -> &'static ScoreRule {
        &SCORE_RULES[animal.index()]
    }

    #[inline]
    pub fn tile_weight(&self, tile_type: TileType) -> i32 {
        self.tiles[tile_type.code() as usize]
    }

    #[inline]
    pub fn animal_weight(&self, animal: Animal) -> i32 {
        self.animals[animal.index()]
    }

    /// What a single neighbour adds: its animal's weight when occupied,
    /// otherwise its terrain weight.
    #[inline]
    pub fn neighbor_weight(&self, tile: &Tile) -> i32 {
        match tile.occupant() {
            Some(animal) => self.animal_weight(animal),
            None => self.tile_weight(tile.tile_type()),
        }
    }

    /// Per-neighbour weights around `center`, zeros included.
    fn scan<'a>(&'a self, grid: &'a Grid, center: Pos) -> impl Iterator<Item = (Pos, i32)> + 'a {
        grid.neighborhood(center, self.radius)
            .map(move |tile| (tile.pos(), self.neighbor_weight(tile)))
    }

    /// Points earned by placing this rule's animal at `center`, never negative.
    pub fn score(&self, grid: &Grid, center: Pos) -> Result<u32, GridError> {
        grid.tile_at(center)?;
        let total = self.points + self.scan(grid, center).map(|(_, w)| w).sum::<i32>();
        Ok(total.max(0) as u32)
    }

    /// Non-zero contributions of each affected tile, the placement tile
    /// included when `points` is non-zero.
    pub fn contributions(&self, grid: &Grid, center: Pos) -> Result<Contributions, GridError> {
        grid.tile_at(center)?;
        let mut contributions = Contributions::new();
        if self.points != 0 {
            contributions.insert(center, self.points);
        }
        contributions.extend(self.scan(grid, center).filter(|&(_, w)| w != 0));
        Ok(contributions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_table() {
        let bear = ScoreRule::of(Animal::Bear);
        assert_eq!(bear.points, 6);
        assert_eq!(bear.radius, 2);
        assert_eq!(bear.tile_weight(TileType::Tree), 4);
        assert_eq!(bear.tile_weight(TileType::Plain), 0);
        assert_eq!(bear.tile_weight(TileType::Water), 0);
        assert_eq!(bear.animal_weight(Animal::Bear), -5);
        assert_eq!(bear.animal_weight(Animal::Fish), 7);
        assert_eq!(bear.animal_weight(Animal::Fox), -2);

        let fish = ScoreRule::of(Animal::Fish);
        assert_eq!((fish.points, fish.radius), (8, 1));
        assert_eq!(fish.tile_weight(TileType::Water), 5);
        assert_eq!(fish.animal_weight(Animal::Fish), -2);
        assert_eq!(fish.animal_weight(Animal::Bear), 0);

        let fox = ScoreRule::of(Animal::Fox);
        assert_eq!((fox.points, fox.radius), (5, 1));
        assert_eq!(fox.tile_weight(TileType::Plain), 7);
        assert_eq!(fox.animal_weight(Animal::Fox), -2);
        assert_eq!(fox.animal_weight(Animal::Fish), 0);
    }

    #[test]
    fn test_bear_on_empty_plain_grid() {
        let grid = Grid::filled("plain", 8, TileType::Plain);
        let bear = ScoreRule::of(Animal::Bear);
        assert_eq!(bear.score(&grid, Pos::new(4, 4)), Ok(6));

        let contributions = bear.contributions(&grid, Pos::new(4, 4)).unwrap();
        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[&Pos::new(4, 4)], 6);
    }

    #[test]
    fn test_fox_counts_empty_plain_neighbours() {
        let grid = Grid::filled("plain", 8, TileType::Plain);
        let fox = ScoreRule::of(Animal::Fox);
        // 8 neighbours * 7 + 5
        assert_eq!(fox.score(&grid, Pos::new(3, 3)), Ok(61));
        // corner: 3 neighbours
        assert_eq!(fox.score(&grid, Pos::new(0, 0)), Ok(26));
    }

    #[test]
    fn test_occupied_neighbour_uses_animal_weight() {
        let mut grid = Grid::filled("forest", 8, TileType::Tree);
        let bear = ScoreRule::of(Animal::Bear);
        // corner window 3x3: 8 trees
        assert_eq!(bear.score(&grid, Pos::new(0, 0)), Ok(6 + 8 * 4));

        grid.set_occupant(Pos::new(1, 1), Animal::Bear).unwrap();
        // one tree replaced by a bear: -4 - 5
        assert_eq!(bear.score(&grid, Pos::new(0, 0)), Ok(6 + 7 * 4 - 5));

        let contributions = bear.contributions(&grid, Pos::new(0, 0)).unwrap();
        assert_eq!(contributions[&Pos::new(1, 1)], -5);
        assert_eq!(contributions[&Pos::new(2, 2)], 4);
        assert_eq!(contributions[&Pos::new(0, 0)], 6);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut grid = Grid::filled("plain", 8, TileType::Plain);
        for pos in [Pos::new(0, 1), Pos::new(1, 0), Pos::new(1, 1)] {
            grid.set_occupant(pos, Animal::Bear).unwrap();
        }
        let bear = ScoreRule::of(Animal::Bear);
        // 6 - 3 * 5 = -9
        assert_eq!(bear.score(&grid, Pos::new(0, 0)), Ok(0));

        let contributions = bear.contributions(&grid, Pos::new(0, 0)).unwrap();
        let raw: i32 = contributions.values().sum();
        assert_eq!(raw, -9);
    }

    #[test]
    fn test_contributions_sum_matches_unclamped_score() {
        let grid = Grid::create("mixed", 8, |pos| TileType::ALL[(pos.x * 3 + pos.y) % 3]);
        for animal in Animal::ALL {
            let rule = ScoreRule::of(animal);
            for tile in grid.tiles() {
                let sum: i32 = rule.contributions(&grid, tile.pos()).unwrap().values().sum();
                let score = rule.score(&grid, tile.pos()).unwrap();
                assert_eq!(score, sum.max(0) as u32);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_center() {
        let grid = Grid::filled("plain", 8, TileType::Plain);
        let fox = ScoreRule::of(Animal::Fox);
        assert!(fox.score(&grid, Pos::new(8, 0)).is_err());
        assert!(fox.contributions(&grid, Pos::new(0, 8)).is_err());
    }
}
