// vraster/renderer/src/tile_pool.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A bounded free-list of `Tile` allocations, reused across rasterization
//! invocations to cap memory held by pathological paths.

use crate::tile::Tile;

/// Retained tiles beyond this many are simply dropped instead of pooled.
pub const DEFAULT_TILE_POOL_CAPACITY: usize = 4096;

pub struct TilePool {
    free: Vec<Tile>,
    capacity: usize,
}

impl TilePool {
    pub fn new() -> TilePool {
        TilePool::with_capacity(DEFAULT_TILE_POOL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> TilePool {
        TilePool { free: Vec::new(), capacity }
    }

    /// Acquires a tile for `(tx, ty)`, either reusing a pooled one (always
    /// `reset()` before being handed out) or allocating fresh.
    pub fn acquire(&mut self, tx: i32, ty: i32) -> Tile {
        match self.free.pop() {
            Some(mut tile) => {
                tile.reset();
                tile.set_coord(tx, ty);
                tile
            }
            None => Tile::new(tx, ty),
        }
    }

    /// Returns a tile to the pool, dropping it if the pool is already at
    /// capacity.
    pub fn release(&mut self, tile: Tile) {
        if self.free.len() < self.capacity {
            self.free.push(tile);
        }
    }

    pub fn pooled_count(&self) -> usize {
        self.free.len()
    }
}

impl Default for TilePool {
    fn default() -> TilePool {
        TilePool::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquired_tile_has_fresh_coverage() {
        let mut pool = TilePool::new();
        let mut tile = pool.acquire(0, 0);
        tile.set_coverage_at(0, 0, 200);
        tile.backdrop = 3;
        pool.release(tile);

        let tile2 = pool.acquire(1, 2);
        assert_eq!(tile2.coverage_at(0, 0), 0);
        assert_eq!(tile2.backdrop, 0);
        assert_eq!((tile2.tx, tile2.ty), (1, 2));
    }

    #[test]
    fn pool_is_bounded() {
        let mut pool = TilePool::with_capacity(2);
        for i in 0..5 {
            pool.release(Tile::new(i, 0));
        }
        assert_eq!(pool.pooled_count(), 2);
    }
}
