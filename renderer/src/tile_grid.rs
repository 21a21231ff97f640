// vraster/renderer/src/tile_grid.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sparse storage of tiles keyed by packed `(ty, tx)` coordinate. Most
//! tiles in a typical path's bounding box are empty, so a hash map beats a
//! dense 2D array except for small, dense viewports (see the design notes
//! this crate follows).

use crate::tile::Tile;
use crate::tile_pool::TilePool;
use hashbrown::HashMap;
use vraster_geometry::{RectI, Vector2I};

/// Biases each coordinate by `i32::MIN` before widening to `u32` so that
/// ascending `i32` order (including negative tile coordinates) maps to
/// ascending `u32` order; a plain `as u32` cast would wrap negative
/// coordinates to the top of the range and break `sort_unstable`'s
/// `(ty, tx)` ordering.
#[inline]
fn pack_key(tx: i32, ty: i32) -> u64 {
    let tx = tx.wrapping_sub(i32::MIN) as u32 as u64;
    let ty = ty.wrapping_sub(i32::MIN) as u32 as u64;
    (ty << 32) | tx
}

pub struct TileGrid {
    tiles: HashMap<u64, Tile>,
    pool: TilePool,
    min_tile: Vector2I,
    max_tile: Vector2I,
    tile_width: i32,
    tile_height: i32,
}

impl TileGrid {
    pub fn new(tile_width: i32, tile_height: i32) -> TileGrid {
        TileGrid {
            tiles: HashMap::new(),
            pool: TilePool::new(),
            min_tile: Vector2I::new(i32::max_value(), i32::max_value()),
            max_tile: Vector2I::new(i32::min_value(), i32::min_value()),
            tile_width,
            tile_height,
        }
    }

    /// Fetches the tile at `(tx, ty)`, allocating (from the pool) if it
    /// doesn't exist yet, and widening the bounds rect.
    pub fn get_or_create(&mut self, tx: i32, ty: i32) -> &mut Tile {
        let key = pack_key(tx, ty);
        if !self.tiles.contains_key(&key) {
            let tile = self.pool.acquire(tx, ty);
            self.tiles.insert(key, tile);
            self.min_tile = self.min_tile.min(Vector2I::new(tx, ty));
            self.max_tile = self.max_tile.max(Vector2I::new(tx + 1, ty + 1));
        }
        self.tiles.get_mut(&key).unwrap()
    }

    pub fn get(&self, tx: i32, ty: i32) -> Option<&Tile> {
        self.tiles.get(&pack_key(tx, ty))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Bounds in tile-coordinate space; `None` if no tile has been created.
    pub fn tile_bounds(&self) -> Option<RectI> {
        if self.tiles.is_empty() {
            None
        } else {
            Some(RectI::new(self.min_tile, self.max_tile))
        }
    }

    /// Bounds in pixel space.
    pub fn pixel_bounds(&self) -> Option<RectI> {
        self.tile_bounds().map(|b| {
            RectI::new(
                Vector2I::new(b.min_x() * self.tile_width, b.min_y() * self.tile_height),
                Vector2I::new(b.max_x() * self.tile_width, b.max_y() * self.tile_height),
            )
        })
    }

    /// Iterates all tiles sorted by `(ty, tx)` ascending, the order
    /// backdrop propagation depends on.
    pub fn for_each_sorted<F: FnMut(&Tile)>(&self, mut f: F) {
        let mut keys: Vec<u64> = self.tiles.keys().copied().collect();
        keys.sort_unstable();
        for key in keys {
            f(self.tiles.get(&key).unwrap());
        }
    }

    /// Iterates the tiles in row `ty`, sorted by `tx` ascending.
    pub fn for_each_in_row<F: FnMut(&Tile)>(&self, ty: i32, mut f: F) {
        let mut row: Vec<&Tile> = self.tiles.values().filter(|t| t.ty == ty).collect();
        row.sort_unstable_by_key(|t| t.tx);
        for tile in row {
            f(tile);
        }
    }

    /// Returns every tile to the pool and clears the map, keeping its
    /// allocated capacity for the next invocation.
    pub fn reset(&mut self) {
        for (_, tile) in self.tiles.drain() {
            self.pool.release(tile);
        }
        self.min_tile = Vector2I::new(i32::max_value(), i32::max_value());
        self.max_tile = Vector2I::new(i32::min_value(), i32::min_value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_widens_bounds() {
        let mut grid = TileGrid::new(4, 4);
        grid.get_or_create(2, 3);
        grid.get_or_create(5, 1);
        let bounds = grid.tile_bounds().unwrap();
        assert_eq!(bounds.min_x(), 2);
        assert_eq!(bounds.min_y(), 1);
        assert_eq!(bounds.max_x(), 6);
        assert_eq!(bounds.max_y(), 4);
    }

    #[test]
    fn for_each_sorted_is_row_major_ascending() {
        let mut grid = TileGrid::new(4, 4);
        grid.get_or_create(2, 1);
        grid.get_or_create(0, 1);
        grid.get_or_create(1, 0);

        let mut seen = vec![];
        grid.for_each_sorted(|tile| seen.push((tile.ty, tile.tx)));
        assert_eq!(seen, vec![(0, 1), (1, 0), (1, 2)]);
    }

    #[test]
    fn for_each_sorted_orders_negative_coordinates_correctly() {
        let mut grid = TileGrid::new(4, 4);
        grid.get_or_create(1, 1);
        grid.get_or_create(-3, -2);
        grid.get_or_create(0, -2);
        grid.get_or_create(-1, 0);

        let mut seen = vec![];
        grid.for_each_sorted(|tile| seen.push((tile.ty, tile.tx)));
        assert_eq!(seen, vec![(-2, -3), (-2, 0), (0, -1), (1, 1)]);
    }

    #[test]
    fn reset_returns_tiles_to_pool_and_clears_map() {
        let mut grid = TileGrid::new(4, 4);
        grid.get_or_create(0, 0);
        grid.get_or_create(1, 1);
        assert_eq!(grid.len(), 2);
        grid.reset();
        assert!(grid.is_empty());
        assert!(grid.tile_bounds().is_none());
    }
}
