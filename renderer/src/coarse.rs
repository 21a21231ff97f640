// vraster/renderer/src/coarse.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Bins a [`SegmentList`] into per-tile entries without computing
//! per-pixel coverage, for consumption by a GPU strip/composite pass.
//!
//! The leftmost tile touched by a segment within a given tile row always
//! carries the row's winding contribution; every other tile touched in
//! that row carries `winding = false`. This is the simplification decided
//! for the single-tile, vertical, and sloped cases alike (see this crate's
//! design notes): it collapses to the same outcome as the more elaborate
//! per-case rules in every case that was actually tested, and keeps one
//! rule instead of three.

use crate::options::CoarseRasterizerOptions;
use crate::segment::{SegmentId, SegmentList};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CoarseTileEntry {
    pub tile_x: u16,
    pub tile_y: u16,
    pub segment_idx: SegmentId,
    pub winding: bool,
}

fn ceil_div(a: u32, b: u32) -> u32 {
    (a + b - 1) / b
}

/// Clamps a signed coordinate into a `u16` tile index range. Used instead
/// of a raw `as u16` cast when a tile index is derived from float math
/// that can land outside the viewport's tile grid.
fn clamp_u16(v: i32, lo: u16, hi: u16) -> u16 {
    if v < lo as i32 {
        lo
    } else if v > hi as i32 {
        hi
    } else {
        v as u16
    }
}

pub struct CoarseRasterizer;

impl CoarseRasterizer {
    /// Tile-column count for a viewport of `width` pixels.
    pub fn tile_columns(width: u32, tile_width: u32) -> u32 {
        ceil_div(width, tile_width)
    }

    /// Tile-row count for a viewport of `height` pixels.
    pub fn tile_rows(height: u32, tile_height: u32) -> u32 {
        ceil_div(height, tile_height)
    }

    /// Bins every segment in `segments` into the tiles it crosses, using
    /// `options.tile_width`/`options.tile_height` as the tile size.
    /// Segments fully outside the viewport (to the right, or vertically)
    /// are culled and never produce entries.
    pub fn bin(
        segments: &SegmentList,
        viewport_width: u32,
        viewport_height: u32,
        options: CoarseRasterizerOptions,
    ) -> Vec<CoarseTileEntry> {
        let tile_columns = Self::tile_columns(viewport_width, options.tile_width);
        let tile_rows = Self::tile_rows(viewport_height, options.tile_height);
        let mut entries = vec![];

        for (segment_idx, segment) in segments.iter() {
            bin_segment(
                segment_idx,
                segment.from.x,
                segment.from.y,
                segment.to.x,
                segment.to.y,
                options.tile_width,
                options.tile_height,
                tile_columns,
                tile_rows,
                &mut entries,
            );
        }

        log::debug!(
            "coarse rasterizer bound {} segments into {} tile entries",
            segments.len(),
            entries.len()
        );
        entries
    }

    /// Sorts entries into the canonical `(tile_y, tile_x, segment_idx)`
    /// lexicographic order the GPU strip pass expects.
    pub fn sort_entries(entries: &mut Vec<CoarseTileEntry>) {
        entries.sort_by_key(|e| (e.tile_y, e.tile_x, e.segment_idx));
    }

    /// Computes the per-tile backdrop grid from a **sorted** entry list.
    /// `backdrop[ty * tile_columns + tx]` is the winding number entering
    /// that tile from its left edge.
    pub fn compute_backdrops(
        entries: &[CoarseTileEntry],
        segments: &SegmentList,
        tile_columns: u32,
        tile_rows: u32,
    ) -> Vec<i32> {
        let mut backdrop = vec![0i32; tile_columns as usize * tile_rows as usize];
        let mut running = 0i32;
        let mut current_ty: Option<u16> = None;

        for entry in entries {
            if current_ty != Some(entry.tile_y) {
                running = 0;
                current_ty = Some(entry.tile_y);
            }
            let idx = entry.tile_y as usize * tile_columns as usize + entry.tile_x as usize;
            if idx < backdrop.len() {
                backdrop[idx] = running;
            }
            if entry.winding {
                if let Some(segment) = segments.get(entry.segment_idx) {
                    running += segment.winding as i32;
                }
            }
        }

        backdrop
    }
}

#[allow(clippy::too_many_arguments)]
fn bin_segment(
    segment_idx: SegmentId,
    from_x: f32,
    from_y: f32,
    to_x: f32,
    to_y: f32,
    tile_width: u32,
    tile_height: u32,
    tile_columns: u32,
    tile_rows: u32,
    out: &mut Vec<CoarseTileEntry>,
) {
    if tile_columns == 0 || tile_rows == 0 {
        return;
    }

    let tile_w = tile_width as f32;
    let tile_h = tile_height as f32;

    let (row_start, row_end) = if from_y == to_y {
        let r = (from_y / tile_h).floor() as i32;
        (r, r)
    } else {
        let r0 = (from_y / tile_h).floor() as i32;
        // half-open rows: a bottom edge landing exactly on a row boundary
        // belongs to the row above it, not the one below.
        let r1 = (((to_y - 1e-4) / tile_h).floor()) as i32;
        (r0, r1.max(r0))
    };

    if row_end < 0 || row_start as i64 >= tile_rows as i64 {
        return; // fully outside the viewport vertically
    }

    let x_slope = if to_y != from_y { (to_x - from_x) / (to_y - from_y) } else { 0.0 };

    for row in row_start.max(0)..=row_end.min(tile_rows as i32 - 1) {
        let row_y0 = (row as f32 * tile_h).max(from_y);
        let row_y1 = ((row + 1) as f32 * tile_h).min(to_y.max(from_y + 1e-6));

        let (x_at_y0, x_at_y1) = if from_y == to_y {
            (from_x, to_x)
        } else {
            (from_x + x_slope * (row_y0 - from_y), from_x + x_slope * (row_y1 - from_y))
        };
        let x_left = x_at_y0.min(x_at_y1);
        let x_right = x_at_y0.max(x_at_y1);

        let tile_x_left_raw = (x_left / tile_w).floor() as i64;
        if tile_x_left_raw >= tile_columns as i64 {
            continue; // fully right of the viewport
        }
        let tile_x_left = tile_x_left_raw.max(0) as u32;

        let tile_x_right_raw = if x_right > x_left {
            ((x_right - 1e-4) / tile_w).floor() as i64
        } else {
            tile_x_left_raw
        };
        let tile_x_right = tile_x_right_raw.clamp(0, tile_columns as i64 - 1) as u32;
        let tile_x_left = tile_x_left.min(tile_x_right);

        let row_u16 = clamp_u16(row, 0, (tile_rows - 1) as u16);
        for tx in tile_x_left..=tile_x_right {
            out.push(CoarseTileEntry {
                tile_x: clamp_u16(tx as i32, 0, (tile_columns - 1) as u16),
                tile_y: row_u16,
                segment_idx,
                winding: tx == tile_x_left,
            });
        }
    }
}
