// vraster/gpu/src/pipeline_cache.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A concurrent, content-hash-keyed cache of compiled pipeline objects.
//! Readers proceed in parallel under a reader-writer lock; double-checked
//! locking on the write path guarantees a descriptor is created at most
//! once even under concurrent first-time lookups.

use crate::device::Device;
use crate::error::Error;
use crate::pipeline_descriptor::{
    hash_compute_pipeline_descriptor, hash_render_pipeline_descriptor, validate_compute_pipeline_descriptor,
    validate_render_pipeline_descriptor, ComputePipelineDescriptor, RenderPipelineDescriptor,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct PipelineCache<H: Clone> {
    pipelines: RwLock<HashMap<u64, H>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<H: Clone> PipelineCache<H> {
    pub fn new() -> PipelineCache<H> {
        PipelineCache { pipelines: RwLock::new(HashMap::new()), hits: AtomicUsize::new(0), misses: AtomicUsize::new(0) }
    }

    /// Returns the cached pipeline for `hash`, creating it via `create` on
    /// a miss. Double-checks under the write lock so two concurrent
    /// first-time callers never both construct a pipeline.
    pub fn get_or_create<F>(&self, hash: u64, create: F) -> Result<H, Error>
    where
        F: FnOnce() -> Result<H, Error>,
    {
        if let Some(existing) = self.pipelines.read().get(&hash) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(existing.clone());
        }

        let mut pipelines = self.pipelines.write();
        if let Some(existing) = pipelines.get(&hash) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(existing.clone());
        }

        let pipeline = create()?;
        pipelines.insert(hash, pipeline.clone());
        self.misses.fetch_add(1, Ordering::Relaxed);
        log::debug!("pipeline cache miss for hash {:016x}", hash);
        Ok(pipeline)
    }

    /// A lock-free read; hit/miss counts may be observed briefly out of
    /// sync with the map's contents.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }

    pub fn len(&self) -> usize {
        self.pipelines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.read().is_empty()
    }

    /// Discards the map and zeros the stats without destroying the
    /// underlying GPU objects.
    pub fn clear(&self) {
        self.pipelines.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Destroys every cached pipeline via `destroy`, then clears.
    pub fn destroy_all<F: Fn(&H)>(&self, destroy: F) {
        let mut pipelines = self.pipelines.write();
        for pipeline in pipelines.values() {
            destroy(pipeline);
        }
        pipelines.clear();
        drop(pipelines);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl<H: Clone> Default for PipelineCache<H> {
    fn default() -> PipelineCache<H> {
        PipelineCache::new()
    }
}

/// The lookup protocol end to end: validate the descriptor, compute its
/// content hash, and consult `cache`, creating a pipeline via `device` on
/// a miss.
pub fn request_render_pipeline<D: Device>(
    cache: &PipelineCache<D::RenderPipelineHandle>,
    device: &D,
    descriptor: &RenderPipelineDescriptor,
) -> Result<D::RenderPipelineHandle, Error> {
    validate_render_pipeline_descriptor(descriptor)?;
    let hash = hash_render_pipeline_descriptor(descriptor);
    cache.get_or_create(hash, || device.create_render_pipeline(descriptor))
}

pub fn request_compute_pipeline<D: Device>(
    cache: &PipelineCache<D::ComputePipelineHandle>,
    device: &D,
    descriptor: &ComputePipelineDescriptor,
) -> Result<D::ComputePipelineHandle, Error> {
    validate_compute_pipeline_descriptor(descriptor)?;
    let hash = hash_compute_pipeline_descriptor(descriptor);
    cache.get_or_create(hash, || device.create_compute_pipeline(descriptor))
}
