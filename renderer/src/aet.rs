// vraster/renderer/src/aet.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The active-edge table and the analytic scanline filler built on top of
//! it. Walks edges top to bottom, maintaining the set of edges crossing
//! the current row, and emits one [`AlphaRuns`] callback per scanline that
//! has any inside coverage.

use crate::alpha_runs::{catch_overflow, AlphaRuns};
use crate::edge::{EdgeCollection, EdgeKind, MonotonicEdge};
use crate::fill_rule::FillRule;
use vraster_geometry::{fdot16_from_f32, fdot16_to_f32, FDot16};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EdgeVariant {
    Line,
    Quad,
    Cubic,
}

/// An edge currently crossing the scanline being processed.
#[derive(Clone, Copy, Debug)]
pub struct ActiveEdgeEntry {
    pub x: FDot16,
    pub dxdy: FDot16,
    pub bottom_y: f32,
    pub winding: i8,
    pub variant: EdgeVariant,
}

struct LineInfo {
    top_y: f32,
    bottom_y: f32,
    x_at_top: f32,
    dxdy: f32,
    winding: i8,
    variant: EdgeVariant,
}

/// Reduces an edge to the line its active-edge math actually steps along.
/// Quadratics and cubics are approximated by their chord; callers that need
/// precise higher-order coverage should build with curve flattening enabled
/// so the edge collection contains only lines.
fn line_info_of(edge: &MonotonicEdge) -> Option<LineInfo> {
    let (from, to, variant) = match edge.kind {
        EdgeKind::Line(l) => (l.from, l.to, EdgeVariant::Line),
        EdgeKind::Quad(q) => {
            log::warn!("approximating a retained quadratic edge with its chord");
            (q.from, q.to, EdgeVariant::Quad)
        }
        EdgeKind::Cubic(c) => {
            log::warn!("approximating a retained cubic edge with its chord");
            (c.from, c.to, EdgeVariant::Cubic)
        }
    };
    let (top, bottom) = if from.y <= to.y { (from, to) } else { (to, from) };
    let dy = bottom.y - top.y;
    if dy <= 0.0 {
        return None;
    }
    Some(LineInfo {
        top_y: top.y,
        bottom_y: bottom.y,
        x_at_top: top.x,
        dxdy: (bottom.x - top.x) / dy,
        winding: edge.winding,
        variant,
    })
}

fn insertion_sort_by_x(aet: &mut Vec<ActiveEdgeEntry>) {
    for i in 1..aet.len() {
        let mut j = i;
        while j > 0 && aet[j - 1].x > aet[j].x {
            aet.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Paints the analytic coverage of one continuous "inside" span `[x0, x1)`
/// into `alpha_runs`: partial alpha at the two boundary columns, full 255
/// in between.
fn paint_span(alpha_runs: &mut AlphaRuns, x0: f32, x1: f32) {
    if x1 <= x0 {
        return;
    }
    let left_col = x0.floor() as i32;
    let right_col = x1.floor() as i32;

    if left_col == right_col {
        let alpha = catch_overflow(((x1 - x0) * 255.0).round() as i32);
        if alpha > 0 {
            alpha_runs.add(left_col, alpha, 1, alpha);
        }
        return;
    }

    let left_alpha = catch_overflow((((left_col + 1) as f32 - x0) * 255.0).round() as i32);
    if left_alpha > 0 {
        alpha_runs.add(left_col, left_alpha, 1, left_alpha);
    }

    let middle_start = left_col + 1;
    let middle_len = right_col - middle_start;
    if middle_len > 0 {
        alpha_runs.add(middle_start, 255, middle_len as u32, 255);
    }

    let right_alpha = catch_overflow(((x1 - right_col as f32) * 255.0).round() as i32);
    if right_alpha > 0 {
        alpha_runs.add(right_col, right_alpha, 1, right_alpha);
    }
}

pub struct AnalyticFiller<'a> {
    edges: &'a EdgeCollection,
    fill_rule: FillRule,
}

impl<'a> AnalyticFiller<'a> {
    pub fn new(edges: &'a EdgeCollection, fill_rule: FillRule) -> AnalyticFiller<'a> {
        AnalyticFiller { edges, fill_rule }
    }

    /// Walks every scanline from the edge collection's top to its bottom,
    /// invoking `callback(y, &alpha_runs)` for each row with inside
    /// coverage. Rows with no active inside interval are skipped entirely.
    pub fn fill<F: FnMut(i32, &AlphaRuns)>(&self, mut callback: F) {
        if self.edges.is_empty() {
            return;
        }

        let lines: Vec<LineInfo> = self.edges.edges().iter().filter_map(line_info_of).collect();
        if lines.is_empty() {
            return;
        }

        let min_y = lines.iter().map(|l| l.top_y).fold(f32::INFINITY, f32::min).floor() as i32;
        let max_y = lines.iter().map(|l| l.bottom_y).fold(f32::NEG_INFINITY, f32::max).ceil() as i32;

        let mut order: Vec<usize> = (0..lines.len()).collect();
        order.sort_by(|&a, &b| lines[a].top_y.partial_cmp(&lines[b].top_y).unwrap());
        let mut next_to_insert = 0usize;

        let mut aet: Vec<ActiveEdgeEntry> = vec![];
        let mut alpha_runs = AlphaRuns::new();

        for y in min_y..max_y {
            let yf = y as f32;

            while next_to_insert < order.len() && lines[order[next_to_insert]].top_y <= yf + 1e-6 {
                let line = &lines[order[next_to_insert]];
                let x_at_y = line.x_at_top + line.dxdy * (yf - line.top_y);
                aet.push(ActiveEdgeEntry {
                    x: fdot16_from_f32(x_at_y),
                    dxdy: fdot16_from_f32(line.dxdy),
                    bottom_y: line.bottom_y,
                    winding: line.winding,
                    variant: line.variant,
                });
                next_to_insert += 1;
            }

            aet.retain(|e| e.bottom_y > yf + 1e-6);

            insertion_sort_by_x(&mut aet);

            alpha_runs.reset();
            let mut running = 0i32;
            let mut span_start: Option<f32> = None;
            for entry in &aet {
                let was_inside = self.fill_rule.is_inside(running);
                running += entry.winding as i32;
                let now_inside = self.fill_rule.is_inside(running);
                let xm = fdot16_to_f32(entry.x) + fdot16_to_f32(entry.dxdy) * 0.5;

                if !was_inside && now_inside {
                    span_start = Some(xm);
                } else if was_inside && !now_inside {
                    if let Some(x0) = span_start.take() {
                        paint_span(&mut alpha_runs, x0, xm);
                    }
                }
            }

            if !alpha_runs.is_empty() {
                log::trace!("scanline {} emitted {} coverage runs", y, alpha_runs.iter().count());
                callback(y, &alpha_runs);
            }

            for entry in aet.iter_mut() {
                entry.x = entry.x.wrapping_add(entry.dxdy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeBuilder;
    use crate::options::{AaLevel, EdgeBuilderOptions};
    use crate::path::Path;
    use vraster_geometry::{Transform2F, Vector2F};

    fn square_path() -> Path {
        let mut path = Path::new();
        path.move_to(Vector2F::new(7.0, 7.0));
        path.line_to(Vector2F::new(13.0, 7.0));
        path.line_to(Vector2F::new(13.0, 13.0));
        path.line_to(Vector2F::new(7.0, 13.0));
        path.close();
        path
    }

    #[test]
    fn empty_collection_emits_no_callbacks() {
        let edges = EdgeCollection::new();
        let filler = AnalyticFiller::new(&edges, FillRule::NonZero);
        let mut rows = 0;
        filler.fill(|_, _| rows += 1);
        assert_eq!(rows, 0);
    }

    #[test]
    fn axis_aligned_square_covers_exact_interior_rows() {
        let path = square_path();
        let edges = EdgeBuilder::build(&path, Transform2F::identity(), EdgeBuilderOptions::default());
        let filler = AnalyticFiller::new(&edges, FillRule::NonZero);

        let mut rows = vec![];
        filler.fill(|y, runs| rows.push((y, runs.iter().collect::<Vec<_>>())));

        assert_eq!(rows.len(), 6); // rows 7..13
        for (y, cols) in &rows {
            assert!((7..13).contains(y));
            assert_eq!(cols.len(), 6); // columns 7..13
            for &(x, alpha) in cols {
                assert!((7..13).contains(&x));
                assert_eq!(alpha, 255);
            }
        }
    }

    #[test]
    fn alpha_runs_are_strictly_increasing_and_positive() {
        let mut path = Path::new();
        path.move_to(Vector2F::new(0.0, 0.0));
        path.line_to(Vector2F::new(20.0, 0.0));
        path.line_to(Vector2F::new(20.0, 20.0));
        path.line_to(Vector2F::new(0.0, 20.0));
        path.close();

        let edges = EdgeBuilder::build(&path, Transform2F::identity(), EdgeBuilderOptions::default());
        let filler = AnalyticFiller::new(&edges, FillRule::NonZero);
        filler.fill(|_, runs| {
            let cols: Vec<_> = runs.iter().collect();
            for window in cols.windows(2) {
                assert!(window[0].0 < window[1].0);
            }
            for &(_, a) in &cols {
                assert!(a > 0);
            }
        });
    }

    #[test]
    fn cubic_circle_approximation_covers_the_interior_within_tolerance() {
        // center (10, 10), radius 7, via the four-segment unit-cubic
        // circle approximation (k = 0.5522847498).
        const CX: f32 = 10.0;
        const CY: f32 = 10.0;
        const R: f32 = 7.0;
        const K: f32 = 0.5522847498;

        let mut path = Path::new();
        path.move_to(Vector2F::new(CX + R, CY));
        path.cubic_to(
            Vector2F::new(CX + R, CY + R * K),
            Vector2F::new(CX + R * K, CY + R),
            Vector2F::new(CX, CY + R),
        );
        path.cubic_to(
            Vector2F::new(CX - R * K, CY + R),
            Vector2F::new(CX - R, CY + R * K),
            Vector2F::new(CX - R, CY),
        );
        path.cubic_to(
            Vector2F::new(CX - R, CY - R * K),
            Vector2F::new(CX - R * K, CY - R),
            Vector2F::new(CX, CY - R),
        );
        path.cubic_to(
            Vector2F::new(CX + R * K, CY - R),
            Vector2F::new(CX + R, CY - R * K),
            Vector2F::new(CX + R, CY),
        );
        path.close();

        let options = EdgeBuilderOptions { aa_level: AaLevel::Two, flatten_curves: true };
        let edges = EdgeBuilder::build(&path, Transform2F::identity(), options);
        let filler = AnalyticFiller::new(&edges, FillRule::NonZero);

        let mut covered_pixels = 0u32;
        let mut reference_pixels = 0u32;
        for y in 0..20 {
            for x in 0..20 {
                let dx = x as f32 + 0.5 - CX;
                let dy = y as f32 + 0.5 - CY;
                if dx * dx + dy * dy <= R * R {
                    reference_pixels += 1;
                }
            }
        }

        filler.fill(|_, runs| {
            for &(_, alpha) in runs.iter() {
                assert!(alpha <= 255, "alpha {} out of range", alpha);
                if alpha > 127 {
                    covered_pixels += 1;
                }
            }
        });

        let diff = (covered_pixels as i64 - reference_pixels as i64).unsigned_abs();
        let tolerance = (reference_pixels as f32 * 0.15).ceil() as u64;
        assert!(
            diff <= tolerance,
            "covered {} vs reference {} (tolerance {})",
            covered_pixels,
            reference_pixels,
            tolerance
        );
    }

    #[test]
    fn thin_diagonal_rectangle_has_no_dark_band_across_tile_rows() {
        let mut path = Path::new();
        path.move_to(Vector2F::new(0.0, 0.0));
        path.line_to(Vector2F::new(20.0, 0.0));
        path.line_to(Vector2F::new(190.0, 170.0));
        path.line_to(Vector2F::new(190.0, 190.0));
        path.line_to(Vector2F::new(170.0, 190.0));
        path.line_to(Vector2F::new(0.0, 20.0));
        path.close();

        let edges = EdgeBuilder::build(&path, Transform2F::identity(), EdgeBuilderOptions::default());
        let filler = AnalyticFiller::new(&edges, FillRule::NonZero);

        use std::collections::BTreeSet;
        let mut covered_rows: BTreeSet<i32> = BTreeSet::new();
        filler.fill(|y, runs| {
            let cols: Vec<_> = runs.iter().collect();
            assert!(cols.iter().all(|&(_, alpha)| alpha > 0 && alpha <= 255), "alpha out of range at row {}", y);
            for window in cols.windows(2) {
                assert!(window[0].0 < window[1].0, "row {} columns not ascending", y);
            }
            covered_rows.insert(y);
        });

        // The band is a single connected diagonal sliver from y=0 to y=190;
        // a "dark band" bug at a tile-row boundary would show up as a run
        // of rows with no coverage somewhere in this range.
        let min_row = *covered_rows.iter().next().unwrap();
        let max_row = *covered_rows.iter().next_back().unwrap();
        for y in min_row..=max_row {
            assert!(covered_rows.contains(&y), "row {} has no coverage, suggests a dark band", y);
        }
    }

    #[test]
    fn evenodd_self_overlap_cancels_interior_coverage() {
        // two squares wound the same direction overlapping in the middle;
        // even-odd should leave the overlap uncovered.
        let mut path = Path::new();
        path.move_to(Vector2F::new(0.0, 0.0));
        path.line_to(Vector2F::new(10.0, 0.0));
        path.line_to(Vector2F::new(10.0, 10.0));
        path.line_to(Vector2F::new(0.0, 10.0));
        path.close();
        path.move_to(Vector2F::new(5.0, 0.0));
        path.line_to(Vector2F::new(15.0, 0.0));
        path.line_to(Vector2F::new(15.0, 10.0));
        path.line_to(Vector2F::new(5.0, 10.0));
        path.close();

        let edges = EdgeBuilder::build(&path, Transform2F::identity(), EdgeBuilderOptions::default());
        let filler = AnalyticFiller::new(&edges, FillRule::EvenOdd);
        filler.fill(|_, runs| {
            for (x, _) in runs.iter() {
                assert!(!(5..10).contains(&x), "overlap column {} should cancel under even-odd", x);
            }
        });
    }
}
