// vraster/renderer/src/options.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Call-site options. There is no on-disk configuration for the core (see
//! the external-interfaces section of the spec this crate implements); a
//! small number of knobs are modeled as plain structs passed by the caller,
//! the way `pathfinder_renderer`'s `RendererOptions`/`BuildOptions` are.

/// Curve-flattening quality knob. Higher levels produce more line segments
/// and a tighter fit to the true curve.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AaLevel {
    Zero,
    One,
    Two,
}

impl AaLevel {
    /// Perpendicular chord-error tolerance, in pixels, below which a curve
    /// subdivision is considered flat enough. Nominal 1x/2x/4x precision.
    pub fn flattening_tolerance(self) -> f32 {
        match self {
            AaLevel::Zero => 0.8,
            AaLevel::One => 0.4,
            AaLevel::Two => 0.2,
        }
    }
}

impl Default for AaLevel {
    fn default() -> AaLevel {
        AaLevel::One
    }
}

#[derive(Clone, Copy, Debug)]
pub struct EdgeBuilderOptions {
    pub aa_level: AaLevel,
    pub flatten_curves: bool,
}

impl Default for EdgeBuilderOptions {
    fn default() -> EdgeBuilderOptions {
        EdgeBuilderOptions { aa_level: AaLevel::default(), flatten_curves: true }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CoarseRasterizerOptions {
    pub tile_width: u32,
    pub tile_height: u32,
}

impl Default for CoarseRasterizerOptions {
    fn default() -> CoarseRasterizerOptions {
        CoarseRasterizerOptions {
            tile_width: crate::tile::TILE_SIZE as u32,
            tile_height: crate::tile::TILE_SIZE as u32,
        }
    }
}
