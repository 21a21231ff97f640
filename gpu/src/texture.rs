// vraster/gpu/src/texture.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Texture ownership: a handle plus an immutable descriptor, at most one
//! lazily constructed default view, and an idempotent destroy protocol.

use crate::device::Device;
use crate::error::Error;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TextureDescriptor {
    pub width: u32,
    pub height: u32,
    pub depth_or_array_layers: u32,
    pub mip_level_count: u32,
    pub sample_count: u32,
    pub format: u32,
    pub usage: u32,
}

/// `None` fields inherit from the owning texture; `0` counts mean "all
/// remaining" mip levels / array layers.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TextureViewDescriptor {
    pub format: Option<u32>,
    pub dimension: Option<u32>,
    pub base_mip_level: u32,
    pub mip_level_count: u32,
    pub base_array_layer: u32,
    pub array_layer_count: u32,
}

fn default_view_descriptor(texture: &TextureDescriptor) -> TextureViewDescriptor {
    TextureViewDescriptor {
        format: Some(texture.format),
        dimension: None,
        base_mip_level: 0,
        mip_level_count: 0,
        base_array_layer: 0,
        array_layer_count: 0,
    }
}

pub struct Texture<D: Device> {
    device: D,
    handle: D::TextureHandle,
    descriptor: TextureDescriptor,
    default_view: OnceCell<D::TextureViewHandle>,
    destroyed: AtomicBool,
}

impl<D: Device> Texture<D> {
    pub fn new(device: D, descriptor: TextureDescriptor) -> Result<Texture<D>, Error> {
        let handle = device.create_texture(&descriptor)?;
        Ok(Texture { device, handle, descriptor, default_view: OnceCell::new(), destroyed: AtomicBool::new(false) })
    }

    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    /// The raw handle, or a sentinel-equivalent error if this texture has
    /// been destroyed.
    pub fn handle(&self) -> Result<&D::TextureHandle, Error> {
        if self.destroyed.load(Ordering::Acquire) {
            return Err(Error::ResourceDestroyed);
        }
        Ok(&self.handle)
    }

    /// Returns the lazily-constructed default view, creating it exactly
    /// once even if called concurrently from multiple threads.
    pub fn get_default_view(&self) -> Result<D::TextureViewHandle, Error> {
        if self.destroyed.load(Ordering::Acquire) {
            return Err(Error::ResourceDestroyed);
        }
        self.default_view
            .get_or_try_init(|| {
                let descriptor = default_view_descriptor(&self.descriptor);
                self.device.create_texture_view(&self.handle, &descriptor)
            })
            .cloned()
    }

    /// Creates a new view owned by the caller, independent of the default
    /// view's lifetime.
    pub fn create_view(&self, descriptor: &TextureViewDescriptor) -> Result<TextureView<D>, Error>
    where
        D: Clone,
    {
        if self.destroyed.load(Ordering::Acquire) {
            return Err(Error::ResourceDestroyed);
        }
        let handle = self.device.create_texture_view(&self.handle, descriptor)?;
        Ok(TextureView { device: self.device.clone(), handle, is_default: false })
    }

    /// Idempotent. Destroying a texture also destroys its default view,
    /// if one was ever created.
    pub fn destroy(&self) {
        if self.destroyed.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
            if let Some(view) = self.default_view.get() {
                log::trace!("destroying texture's default view");
                self.device.destroy_texture_view(view);
            }
            log::trace!("destroying texture");
            self.device.destroy_texture(&self.handle);
        }
    }
}

pub struct TextureView<D: Device> {
    device: D,
    handle: D::TextureViewHandle,
    is_default: bool,
}

impl<D: Device> TextureView<D> {
    pub fn handle(&self) -> &D::TextureViewHandle {
        &self.handle
    }

    /// A no-op for a default view: the owning `Texture` controls its
    /// lifetime. Destroys the underlying view for a custom one.
    pub fn destroy(&self) {
        if !self.is_default {
            log::trace!("destroying texture view");
            self.device.destroy_texture_view(&self.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::FakeDevice;
    use std::sync::Arc;

    fn descriptor() -> TextureDescriptor {
        TextureDescriptor { width: 256, height: 256, depth_or_array_layers: 1, mip_level_count: 1, sample_count: 1, format: 0, usage: 0 }
    }

    #[test]
    fn default_view_is_created_exactly_once_across_threads() {
        let texture = Arc::new(Texture::new(FakeDevice::new(), descriptor()).unwrap());
        let views: Vec<u64> = std::thread::scope(|scope| {
            (0..16)
                .map(|_| {
                    let texture = texture.clone();
                    scope.spawn(move || texture.get_default_view().unwrap())
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });
        assert!(views.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn destroy_is_idempotent_and_invalidates_the_handle() {
        let texture = Texture::new(FakeDevice::new(), descriptor()).unwrap();
        assert!(texture.handle().is_ok());
        texture.destroy();
        texture.destroy();
        assert!(matches!(texture.handle(), Err(Error::ResourceDestroyed)));
        assert!(matches!(texture.get_default_view(), Err(Error::ResourceDestroyed)));
    }

    #[test]
    fn destroying_a_default_view_through_the_public_api_is_a_noop() {
        let device = FakeDevice::new();
        let texture = Texture::new(device, descriptor()).unwrap();
        let default_handle = texture.get_default_view().unwrap();
        let view = TextureView { device: FakeDevice::new(), handle: default_handle, is_default: true };
        view.destroy(); // no-op: must not panic or affect the texture's own view
    }
}
