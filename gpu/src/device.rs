// vraster/gpu/src/device.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The GPU hardware abstraction this crate treats as an external
//! collaborator: a small factory surface for the handle types the
//! pipeline cache and texture lifecycle need to create and destroy.

use crate::error::Error;
use crate::pipeline_descriptor::{ComputePipelineDescriptor, RenderPipelineDescriptor};
use crate::texture::{TextureDescriptor, TextureViewDescriptor};

pub trait Device: Send + Sync {
    type RenderPipelineHandle: Clone + Send + Sync + 'static;
    type ComputePipelineHandle: Clone + Send + Sync + 'static;
    type TextureHandle: Clone + Send + Sync + 'static;
    type TextureViewHandle: Clone + Send + Sync + 'static;

    fn create_render_pipeline(&self, descriptor: &RenderPipelineDescriptor) -> Result<Self::RenderPipelineHandle, Error>;
    fn destroy_render_pipeline(&self, handle: &Self::RenderPipelineHandle);

    fn create_compute_pipeline(&self, descriptor: &ComputePipelineDescriptor) -> Result<Self::ComputePipelineHandle, Error>;
    fn destroy_compute_pipeline(&self, handle: &Self::ComputePipelineHandle);

    fn create_texture(&self, descriptor: &TextureDescriptor) -> Result<Self::TextureHandle, Error>;
    fn destroy_texture(&self, handle: &Self::TextureHandle);

    fn create_texture_view(
        &self,
        texture: &Self::TextureHandle,
        descriptor: &TextureViewDescriptor,
    ) -> Result<Self::TextureViewHandle, Error>;
    fn destroy_texture_view(&self, handle: &Self::TextureViewHandle);
}

/// A trivial in-process `Device` used by this crate's own tests: handles
/// are just incrementing integers, and every operation always succeeds.
#[cfg(test)]
pub mod fake {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    pub struct FakeDevice {
        next_handle: AtomicU64,
    }

    impl FakeDevice {
        pub fn new() -> FakeDevice {
            FakeDevice::default()
        }

        fn next(&self) -> u64 {
            self.next_handle.fetch_add(1, Ordering::Relaxed)
        }
    }

    impl Device for FakeDevice {
        type RenderPipelineHandle = u64;
        type ComputePipelineHandle = u64;
        type TextureHandle = u64;
        type TextureViewHandle = u64;

        fn create_render_pipeline(&self, _descriptor: &RenderPipelineDescriptor) -> Result<u64, Error> {
            Ok(self.next())
        }

        fn destroy_render_pipeline(&self, _handle: &u64) {}

        fn create_compute_pipeline(&self, _descriptor: &ComputePipelineDescriptor) -> Result<u64, Error> {
            Ok(self.next())
        }

        fn destroy_compute_pipeline(&self, _handle: &u64) {}

        fn create_texture(&self, _descriptor: &TextureDescriptor) -> Result<u64, Error> {
            Ok(self.next())
        }

        fn destroy_texture(&self, _handle: &u64) {}

        fn create_texture_view(&self, _texture: &u64, _descriptor: &TextureViewDescriptor) -> Result<u64, Error> {
            Ok(self.next())
        }

        fn destroy_texture_view(&self, _handle: &u64) {}
    }
}
