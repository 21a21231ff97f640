// vraster/gpu/src/lib.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! GPU resource lifecycle management sitting below the rasterizer core:
//! a content-hash-keyed pipeline cache, texture/view ownership with a
//! lazily constructed default view, and the command-encoder state
//! machine that guards recording order. None of this talks to a real
//! graphics API directly; callers supply a `Device` implementation.

pub mod command_encoder;
pub mod device;
pub mod error;
pub mod pipeline_cache;
pub mod pipeline_descriptor;
pub mod texture;

pub use command_encoder::{CommandEncoder, ComputePassEncoder, EncoderState, RenderPassEncoder};
pub use device::Device;
pub use error::Error;
pub use pipeline_cache::{request_compute_pipeline, request_render_pipeline, PipelineCache};
pub use pipeline_descriptor::{
    hash_compute_pipeline_descriptor, hash_render_pipeline_descriptor, validate_compute_pipeline_descriptor,
    validate_render_pipeline_descriptor, BlendComponent, BlendState, ComputePipelineDescriptor,
    RenderPipelineDescriptor, VertexAttribute, VertexBufferLayout,
};
pub use texture::{Texture, TextureDescriptor, TextureView, TextureViewDescriptor};
