// vraster/geometry/src/rect.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Axis-aligned rectangles, in both floating-point and integer flavors.

use crate::vector::{Vector2F, Vector2I};

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RectF {
    pub origin: Vector2F,
    pub lower_right: Vector2F,
}

impl Default for RectF {
    fn default() -> RectF {
        RectF::new(Vector2F::zero(), Vector2F::zero())
    }
}

impl RectF {
    #[inline]
    pub fn new(origin: Vector2F, lower_right: Vector2F) -> RectF {
        RectF { origin, lower_right }
    }

    #[inline]
    pub fn from_points(a: Vector2F, b: Vector2F) -> RectF {
        RectF::new(a.min(b), a.max(b))
    }

    #[inline]
    pub fn min_x(self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn min_y(self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn max_x(self) -> f32 {
        self.lower_right.x
    }

    #[inline]
    pub fn max_y(self) -> f32 {
        self.lower_right.y
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.max_x() - self.min_x()
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.max_y() - self.min_y()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.max_x() <= self.min_x() || self.max_y() <= self.min_y()
    }

    /// Returns the intersection of `self` and `other`, or `None` if they do
    /// not overlap.
    pub fn intersection(self, other: RectF) -> Option<RectF> {
        let origin = self.origin.max(other.origin);
        let lower_right = self.lower_right.min(other.lower_right);
        let result = RectF::new(origin, lower_right);
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    pub fn union(self, other: RectF) -> RectF {
        RectF::new(self.origin.min(other.origin), self.lower_right.max(other.lower_right))
    }

    pub fn union_point(self, point: Vector2F) -> RectF {
        RectF::new(self.origin.min(point), self.lower_right.max(point))
    }

    #[inline]
    pub fn scale_xy(self, factor: Vector2F) -> RectF {
        RectF::new(self.origin.scale_xy(factor), self.lower_right.scale_xy(factor))
    }

    /// Rounds outward to the nearest integer rect that fully contains this
    /// one (floor on the origin, ceil on the lower-right corner).
    pub fn round_out(self) -> RectF {
        RectF::new(self.origin.floor(), self.lower_right.ceil())
    }

    #[inline]
    pub fn to_i32(self) -> RectI {
        RectI::new(self.origin.to_i32(), self.lower_right.to_i32())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RectI {
    pub origin: Vector2I,
    pub lower_right: Vector2I,
}

impl RectI {
    #[inline]
    pub fn new(origin: Vector2I, lower_right: Vector2I) -> RectI {
        RectI { origin, lower_right }
    }

    #[inline]
    pub fn min_x(self) -> i32 {
        self.origin.x
    }

    #[inline]
    pub fn min_y(self) -> i32 {
        self.origin.y
    }

    #[inline]
    pub fn max_x(self) -> i32 {
        self.lower_right.x
    }

    #[inline]
    pub fn max_y(self) -> i32 {
        self.lower_right.y
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max_x() - self.min_x()
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max_y() - self.min_y()
    }

    #[inline]
    pub fn contains_point(self, point: Vector2I) -> bool {
        point.x >= self.min_x() && point.x < self.max_x() &&
            point.y >= self.min_y() && point.y < self.max_y()
    }
}
