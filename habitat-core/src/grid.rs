//! Square grid of typed tiles.
//!
//! Tiles are stored row-major (`index = y * size + x`). A tile's type is fixed at
//! creation; only its occupant can change, and only through [`Grid::set_occupant`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Animal, Pos, TileType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("tile {x},{y} is outside the {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },
}

/// A single cell of the grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Tile {
    pos: Pos,
    tile_type: TileType,
    occupant: Option<Animal>,
}

impl Tile {
    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn tile_type(&self) -> TileType {
        self.tile_type
    }

    #[inline]
    pub fn occupant(&self) -> Option<Animal> {
        self.occupant
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// A named SIZE x SIZE collection of tiles.
///
/// `Clone` is a deep copy: the clone owns its own tiles, so occupant changes on
/// one never show up on the other.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    name: String,
    size: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Build a grid, asking `tile_factory` for the type of every position.
    pub fn create<F>(name: impl Into<String>, size: usize, mut tile_factory: F) -> Grid
    where
        F: FnMut(Pos) -> TileType,
    {
        let mut tiles = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let pos = Pos::new(x, y);
                tiles.push(Tile {
                    pos,
                    tile_type: tile_factory(pos),
                    occupant: None,
                });
            }
        }
        Grid {
            name: name.into(),
            size,
            tiles,
        }
    }

    /// Grid where every tile has the same type.
    pub fn filled(name: impl Into<String>, size: usize, tile_type: TileType) -> Grid {
        Self::create(name, size, |_| tile_type)
    }

    /// Grid with uniformly random tile types.
    pub fn random<R: Rng + ?Sized>(name: impl Into<String>, size: usize, rng: &mut R) -> Grid {
        Self::create(name, size, |_| TileType::random(&mut *rng))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        pos.y * self.size + pos.x
    }

    fn check(&self, pos: Pos) -> Result<usize, GridError> {
        if self.contains(pos) {
            Ok(self.index(pos))
        } else {
            Err(GridError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                size: self.size,
            })
        }
    }

    /// Tile at `pos`, or `OutOfBounds`.
    pub fn tile_at(&self, pos: Pos) -> Result<&Tile, GridError> {
        let idx = self.check(pos)?;
        Ok(&self.tiles[idx])
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        self.tile_at(pos).ok()
    }

    /// Overwrite the occupant at `pos`.
    /// Does NOT validate placement rules - the engine does that.
    pub fn set_occupant(&mut self, pos: Pos, animal: Animal) -> Result<(), GridError> {
        let idx = self.check(pos)?;
        self.tiles[idx].occupant = Some(animal);
        Ok(())
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter()
    }

    /// Rows of tiles, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.tiles.chunks(self.size.max(1))
    }

    /// Tiles in the square window of `radius` around `center`, clamped to the
    /// grid and excluding `center` itself. Row-major order.
    pub fn neighborhood(&self, center: Pos, radius: usize) -> impl Iterator<Item = &Tile> + '_ {
        let inside = self.contains(center);
        let last = self.size.saturating_sub(1);
        let xs = center.x.saturating_sub(radius)..=center.x.saturating_add(radius).min(last);
        let ys = center.y.saturating_sub(radius)..=center.y.saturating_add(radius).min(last);

        ys.filter(move |_| inside)
            .flat_map(move |y| xs.clone().map(move |x| Pos::new(x, y)))
            .filter(move |&pos| pos != center)
            .map(move |pos| &self.tiles[self.index(pos)])
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|t| !t.is_empty()).count()
    }

    /// Tile types in row-major order (the map wire layout).
    pub fn tile_codes(&self) -> Vec<u8> {
        self.tiles.iter().map(|t| t.tile_type.code()).collect()
    }
}
