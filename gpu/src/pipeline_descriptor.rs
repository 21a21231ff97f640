// vraster/gpu/src/pipeline_descriptor.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Plain-old-data pipeline descriptors, and their little-endian,
//! padding-free serialization into the bytes a 64-bit FNV-1a hash is taken
//! over. Equal descriptors must always serialize identically, and
//! therefore hash identically, regardless of platform.

use crate::error::Error;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: u32,
    pub offset: u64,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VertexBufferLayout {
    pub stride: u64,
    pub step_mode: u32,
    pub attributes: Vec<VertexAttribute>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlendComponent {
    pub src_factor: u32,
    pub dst_factor: u32,
    pub op: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlendState {
    pub color: BlendComponent,
    pub alpha: BlendComponent,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RenderPipelineDescriptor {
    pub shader_code_hash: u64,
    pub entry_point: String,
    pub vertex_buffers: Vec<VertexBufferLayout>,
    pub topology: u32,
    pub front_face: u32,
    pub cull_mode: u32,
    pub color_format: u32,
    pub depth_format: u32,
    pub depth_write_enabled: bool,
    pub depth_compare: u32,
    pub blend: Option<BlendState>,
    pub sample_count: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ComputePipelineDescriptor {
    pub shader_code_hash: u64,
    pub entry_point: String,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn push_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn serialize_render_pipeline_descriptor(desc: &RenderPipelineDescriptor) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&desc.shader_code_hash.to_le_bytes());
    push_string(&mut buf, &desc.entry_point);

    buf.extend_from_slice(&(desc.vertex_buffers.len() as u32).to_le_bytes());
    for layout in &desc.vertex_buffers {
        buf.extend_from_slice(&layout.stride.to_le_bytes());
        buf.extend_from_slice(&layout.step_mode.to_le_bytes());
        buf.extend_from_slice(&(layout.attributes.len() as u32).to_le_bytes());
        for attr in &layout.attributes {
            buf.extend_from_slice(&attr.location.to_le_bytes());
            buf.extend_from_slice(&attr.format.to_le_bytes());
            buf.extend_from_slice(&attr.offset.to_le_bytes());
        }
    }

    for field in [desc.topology, desc.front_face, desc.cull_mode, desc.color_format, desc.depth_format, desc.depth_compare] {
        buf.extend_from_slice(&field.to_le_bytes());
    }

    buf.push(desc.depth_write_enabled as u8);
    match &desc.blend {
        Some(blend) => {
            buf.push(1);
            for field in [
                blend.color.src_factor,
                blend.color.dst_factor,
                blend.color.op,
                blend.alpha.src_factor,
                blend.alpha.dst_factor,
                blend.alpha.op,
            ] {
                buf.extend_from_slice(&field.to_le_bytes());
            }
        }
        None => buf.push(0),
    }

    buf.extend_from_slice(&desc.sample_count.to_le_bytes());
    buf
}

fn serialize_compute_pipeline_descriptor(desc: &ComputePipelineDescriptor) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&desc.shader_code_hash.to_le_bytes());
    push_string(&mut buf, &desc.entry_point);
    buf
}

pub fn hash_render_pipeline_descriptor(desc: &RenderPipelineDescriptor) -> u64 {
    fnv1a64(&serialize_render_pipeline_descriptor(desc))
}

pub fn hash_compute_pipeline_descriptor(desc: &ComputePipelineDescriptor) -> u64 {
    fnv1a64(&serialize_compute_pipeline_descriptor(desc))
}

/// Rejects a nil shader (a zero code hash never identifies real shader
/// bytecode) before the descriptor is hashed or handed to a `Device`.
pub fn validate_render_pipeline_descriptor(desc: &RenderPipelineDescriptor) -> Result<(), Error> {
    if desc.shader_code_hash == 0 {
        return Err(Error::InvalidShader);
    }
    Ok(())
}

pub fn validate_compute_pipeline_descriptor(desc: &ComputePipelineDescriptor) -> Result<(), Error> {
    if desc.shader_code_hash == 0 {
        return Err(Error::InvalidShader);
    }
    Ok(())
}
