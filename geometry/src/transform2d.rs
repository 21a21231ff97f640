// vraster/geometry/src/transform2d.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A 2D affine transform, represented as a row-major 2x3 matrix:
//!
//! ```text
//! | m11 m12 m31 |
//! | m21 m22 m32 |
//! ```
//!
//! matching the inbound contract's "6-component row-major 2x3 matrix".

use crate::line_segment::LineSegment2F;
use crate::vector::Vector2F;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Transform2F {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub m31: f32,
    pub m32: f32,
}

impl Default for Transform2F {
    #[inline]
    fn default() -> Transform2F {
        Transform2F::identity()
    }
}

impl Transform2F {
    #[inline]
    pub fn row_major(m11: f32, m12: f32, m21: f32, m22: f32, m31: f32, m32: f32) -> Transform2F {
        Transform2F { m11, m12, m21, m22, m31, m32 }
    }

    #[inline]
    pub fn identity() -> Transform2F {
        Transform2F::row_major(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    pub fn from_translation(t: Vector2F) -> Transform2F {
        Transform2F::row_major(1.0, 0.0, 0.0, 1.0, t.x, t.y)
    }

    #[inline]
    pub fn from_scale(s: Vector2F) -> Transform2F {
        Transform2F::row_major(s.x, 0.0, 0.0, s.y, 0.0, 0.0)
    }

    /// Applies this transform to a point.
    #[inline]
    pub fn apply(self, point: Vector2F) -> Vector2F {
        Vector2F::new(
            self.m11 * point.x + self.m21 * point.y + self.m31,
            self.m12 * point.x + self.m22 * point.y + self.m32,
        )
    }

    #[inline]
    pub fn apply_to_line_segment(self, segment: LineSegment2F) -> LineSegment2F {
        LineSegment2F::new(self.apply(segment.from), self.apply(segment.to))
    }

    /// Composes `self` after `other`, i.e. `(self * other).apply(p) ==
    /// self.apply(other.apply(p))`.
    pub fn concat(self, other: Transform2F) -> Transform2F {
        Transform2F::row_major(
            self.m11 * other.m11 + self.m21 * other.m12,
            self.m12 * other.m11 + self.m22 * other.m12,
            self.m11 * other.m21 + self.m21 * other.m22,
            self.m12 * other.m21 + self.m22 * other.m22,
            self.m11 * other.m31 + self.m21 * other.m32 + self.m31,
            self.m12 * other.m31 + self.m22 * other.m32 + self.m32,
        )
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Transform2F::identity()
    }
}
