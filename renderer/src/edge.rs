// vraster/renderer/src/edge.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turns a [`Path`]'s verb stream into a collection of Y-monotonic edges:
//! lines always, plus retained quadratics/cubics when curve flattening is
//! disabled (for the analytic filler's higher-order coverage math).

use crate::options::EdgeBuilderOptions;
use crate::path::{Path, PathVerb};
use vraster_geometry::{CubicCurveSegment2F, LineSegment2F, QuadCurveSegment2F, Transform2F, Vector2F};

/// Maximum recursion depth for curve flattening. Each level halves the
/// chord error, so 16 levels reach far below any plausible tolerance long
/// before it matters.
const MAX_FLATTEN_DEPTH: u32 = 16;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum EdgeKind {
    Line(LineSegment2F),
    Quad(QuadCurveSegment2F),
    Cubic(CubicCurveSegment2F),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct MonotonicEdge {
    pub kind: EdgeKind,
    pub winding: i8,
    pub top_y: f32,
    pub bottom_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct EdgeCollection {
    edges: Vec<MonotonicEdge>,
    line_count: u32,
    quad_count: u32,
    cubic_count: u32,
}

impl EdgeCollection {
    pub fn new() -> EdgeCollection {
        EdgeCollection::default()
    }

    fn push(&mut self, edge: MonotonicEdge) {
        match edge.kind {
            EdgeKind::Line(_) => self.line_count += 1,
            EdgeKind::Quad(_) => self.quad_count += 1,
            EdgeKind::Cubic(_) => self.cubic_count += 1,
        }
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[MonotonicEdge] {
        &self.edges
    }

    pub fn line_count(&self) -> u32 {
        self.line_count
    }

    pub fn quad_count(&self) -> u32 {
        self.quad_count
    }

    pub fn cubic_count(&self) -> u32 {
        self.cubic_count
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Clears the collection without freeing the backing storage.
    pub fn reset(&mut self) {
        self.edges.clear();
        self.line_count = 0;
        self.quad_count = 0;
        self.cubic_count = 0;
    }
}

pub struct EdgeBuilder;

impl EdgeBuilder {
    /// Consumes `path`, applying `transform` once, and returns the
    /// resulting `EdgeCollection` according to `options`.
    pub fn build(path: &Path, transform: Transform2F, options: EdgeBuilderOptions) -> EdgeCollection {
        let mut collection = EdgeCollection::new();
        let mut cursor = Vector2F::zero();
        let mut subpath_start = Vector2F::zero();

        for verb in path.verbs() {
            match *verb {
                PathVerb::MoveTo(p) => {
                    let p = transform.apply(p);
                    cursor = p;
                    subpath_start = p;
                }
                PathVerb::LineTo(p) => {
                    let p = transform.apply(p);
                    emit_line(&mut collection, cursor, p);
                    cursor = p;
                }
                PathVerb::QuadTo { ctrl, to } => {
                    let ctrl = transform.apply(ctrl);
                    let to = transform.apply(to);
                    emit_quad(&mut collection, QuadCurveSegment2F::new(cursor, ctrl, to), options);
                    cursor = to;
                }
                PathVerb::CubicTo { ctrl0, ctrl1, to } => {
                    let ctrl0 = transform.apply(ctrl0);
                    let ctrl1 = transform.apply(ctrl1);
                    let to = transform.apply(to);
                    emit_cubic(
                        &mut collection,
                        CubicCurveSegment2F::new(cursor, ctrl0, ctrl1, to),
                        options,
                    );
                    cursor = to;
                }
                PathVerb::Close => {
                    emit_line(&mut collection, cursor, subpath_start);
                    cursor = subpath_start;
                }
            }
        }

        collection
    }
}

fn winding_of(from: Vector2F, to: Vector2F) -> Option<i8> {
    if from.y < to.y {
        Some(1)
    } else if from.y > to.y {
        Some(-1)
    } else {
        None
    }
}

fn emit_line(collection: &mut EdgeCollection, from: Vector2F, to: Vector2F) {
    if from == to {
        log::trace!("discarding zero-length line edge at {:?}", from);
        return;
    }
    let winding = match winding_of(from, to) {
        Some(w) => w,
        None => {
            log::trace!("discarding horizontal line edge from {:?} to {:?}", from, to);
            return;
        }
    };
    collection.push(MonotonicEdge {
        kind: EdgeKind::Line(LineSegment2F::new(from, to)),
        winding,
        top_y: from.y.min(to.y),
        bottom_y: from.y.max(to.y),
    });
}

fn emit_quad(collection: &mut EdgeCollection, curve: QuadCurveSegment2F, options: EdgeBuilderOptions) {
    for piece in split_quad_at_extrema(curve) {
        emit_monotonic_quad(collection, piece, options);
    }
}

fn split_quad_at_extrema(curve: QuadCurveSegment2F) -> Vec<QuadCurveSegment2F> {
    match curve.y_extrema().first() {
        Some(&t) => {
            let (a, b) = curve.split(t);
            vec![a, b]
        }
        None => vec![curve],
    }
}

fn emit_monotonic_quad(collection: &mut EdgeCollection, curve: QuadCurveSegment2F, options: EdgeBuilderOptions) {
    let winding = match winding_of(curve.from, curve.to) {
        Some(w) => w,
        None => {
            log::trace!("discarding degenerate quadratic edge at {:?}", curve.from);
            return;
        }
    };
    if options.flatten_curves {
        let tolerance = options.aa_level.flattening_tolerance();
        let mut lines = vec![];
        flatten_quad(curve, tolerance, MAX_FLATTEN_DEPTH, &mut lines);
        for line in lines {
            emit_line(collection, line.from, line.to);
        }
    } else {
        collection.push(MonotonicEdge {
            kind: EdgeKind::Quad(curve),
            winding,
            top_y: curve.from.y.min(curve.to.y),
            bottom_y: curve.from.y.max(curve.to.y),
        });
    }
}

fn flatten_quad(curve: QuadCurveSegment2F, tolerance: f32, depth: u32, out: &mut Vec<LineSegment2F>) {
    if depth == 0 || curve.flatness() <= tolerance {
        out.push(LineSegment2F::new(curve.from, curve.to));
        return;
    }
    let (a, b) = curve.split(0.5);
    flatten_quad(a, tolerance, depth - 1, out);
    flatten_quad(b, tolerance, depth - 1, out);
}

fn emit_cubic(collection: &mut EdgeCollection, curve: CubicCurveSegment2F, options: EdgeBuilderOptions) {
    for piece in split_cubic_at_extrema(curve) {
        emit_monotonic_cubic(collection, piece, options);
    }
}

fn split_cubic_at_extrema(curve: CubicCurveSegment2F) -> Vec<CubicCurveSegment2F> {
    let extrema = curve.y_extrema();
    if extrema.is_empty() {
        return vec![curve];
    }
    let mut pieces = vec![];
    let mut remaining = curve;
    let mut consumed_t = 0.0f32;
    for &t in &extrema {
        let local_t = (t - consumed_t) / (1.0 - consumed_t);
        let (head, tail) = remaining.split(local_t.max(0.0).min(1.0));
        pieces.push(head);
        remaining = tail;
        consumed_t = t;
    }
    pieces.push(remaining);
    pieces
}

fn emit_monotonic_cubic(collection: &mut EdgeCollection, curve: CubicCurveSegment2F, options: EdgeBuilderOptions) {
    let winding = match winding_of(curve.from, curve.to) {
        Some(w) => w,
        None => {
            log::trace!("discarding degenerate cubic edge at {:?}", curve.from);
            return;
        }
    };
    if options.flatten_curves {
        let tolerance = options.aa_level.flattening_tolerance();
        let mut lines = vec![];
        flatten_cubic(curve, tolerance, MAX_FLATTEN_DEPTH, &mut lines);
        for line in lines {
            emit_line(collection, line.from, line.to);
        }
    } else {
        collection.push(MonotonicEdge {
            kind: EdgeKind::Cubic(curve),
            winding,
            top_y: curve.from.y.min(curve.to.y),
            bottom_y: curve.from.y.max(curve.to.y),
        });
    }
}

fn flatten_cubic(curve: CubicCurveSegment2F, tolerance: f32, depth: u32, out: &mut Vec<LineSegment2F>) {
    if depth == 0 || curve.flatness() <= tolerance {
        out.push(LineSegment2F::new(curve.from, curve.to));
        return;
    }
    let (a, b) = curve.split(0.5);
    flatten_cubic(a, tolerance, depth - 1, out);
    flatten_cubic(b, tolerance, depth - 1, out);
}
