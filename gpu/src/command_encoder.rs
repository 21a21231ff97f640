// vraster/gpu/src/command_encoder.rs
//
// Copyright © 2020 The Vraster Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The command-encoder state machine: `Recording -> Locked` while a
//! render or compute pass is open, `Recording -> Finished` once the
//! caller is done, `Finished -> Consumed` once a queue accepts the
//! resulting command buffer. A tagged enum is all the inheritance this
//! needs.

use crate::error::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EncoderState {
    Recording,
    Locked,
    Finished,
    Consumed,
}

fn is_aligned(v: u64) -> bool {
    v % 4 == 0
}

/// Validates a `CopyBufferToBuffer`/generic aligned-range operation.
pub fn validate_copy_range(offset: u64, size: u64, buffer_size: u64) -> Result<(), Error> {
    if !is_aligned(offset) {
        return Err(Error::OffsetUnaligned);
    }
    if !is_aligned(size) {
        return Err(Error::SizeUnaligned);
    }
    let end = offset.checked_add(size).ok_or(Error::OutOfBounds)?;
    if end > buffer_size {
        return Err(Error::OutOfBounds);
    }
    Ok(())
}

/// Validates a `ClearBuffer` operation; `size == 0` means "to the end of
/// the buffer from `offset`". Returns the effective size.
pub fn validate_clear_buffer(offset: u64, size: u64, buffer_size: u64) -> Result<u64, Error> {
    if !is_aligned(offset) {
        return Err(Error::OffsetUnaligned);
    }
    let effective_size = if size == 0 { buffer_size.saturating_sub(offset) } else { size };
    if !is_aligned(effective_size) {
        return Err(Error::SizeUnaligned);
    }
    let end = offset.checked_add(effective_size).ok_or(Error::OutOfBounds)?;
    if end > buffer_size {
        return Err(Error::OutOfBounds);
    }
    Ok(effective_size)
}

pub fn validate_indirect_offset(offset: u64) -> Result<(), Error> {
    if !is_aligned(offset) {
        Err(Error::OffsetUnaligned)
    } else {
        Ok(())
    }
}

pub struct CommandEncoder {
    state: EncoderState,
}

impl CommandEncoder {
    pub fn new() -> CommandEncoder {
        CommandEncoder { state: EncoderState::Recording }
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    fn require(&self, expected: EncoderState) -> Result<(), Error> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::StateViolation)
        }
    }

    pub fn begin_render_pass(&mut self) -> Result<RenderPassEncoder<'_>, Error> {
        self.require(EncoderState::Recording)?;
        self.state = EncoderState::Locked;
        Ok(RenderPassEncoder { encoder: self, ended: false })
    }

    pub fn begin_compute_pass(&mut self) -> Result<ComputePassEncoder<'_>, Error> {
        self.require(EncoderState::Recording)?;
        self.state = EncoderState::Locked;
        Ok(ComputePassEncoder { encoder: self, ended: false })
    }

    fn end_pass(&mut self) {
        self.state = EncoderState::Recording;
    }

    /// Copy-operation validation plus the state check: only valid while
    /// `Recording` with no active pass.
    pub fn copy_buffer_to_buffer(
        &self,
        source_present: bool,
        dest_present: bool,
        source_offset: u64,
        dest_offset: u64,
        size: u64,
        source_size: u64,
        dest_size: u64,
    ) -> Result<(), Error> {
        self.require(EncoderState::Recording)?;
        if !source_present || !dest_present {
            return Err(Error::InvalidArgument);
        }
        validate_copy_range(source_offset, size, source_size)?;
        validate_copy_range(dest_offset, size, dest_size)
    }

    pub fn clear_buffer(&self, buffer_present: bool, offset: u64, size: u64, buffer_size: u64) -> Result<u64, Error> {
        self.require(EncoderState::Recording)?;
        if !buffer_present {
            return Err(Error::InvalidArgument);
        }
        validate_clear_buffer(offset, size, buffer_size)
    }

    /// Valid only in `Recording` with no active pass.
    pub fn finish(&mut self) -> Result<(), Error> {
        self.require(EncoderState::Recording)?;
        self.state = EncoderState::Finished;
        Ok(())
    }

    /// Called when a queue accepts the command buffer this encoder
    /// produced; the encoder is observably dead afterward.
    pub fn mark_consumed(&mut self) -> Result<(), Error> {
        self.require(EncoderState::Finished)?;
        self.state = EncoderState::Consumed;
        Ok(())
    }
}

impl Default for CommandEncoder {
    fn default() -> CommandEncoder {
        CommandEncoder::new()
    }
}

pub struct RenderPassEncoder<'a> {
    encoder: &'a mut CommandEncoder,
    ended: bool,
}

impl<'a> RenderPassEncoder<'a> {
    fn check_active(&self) -> Result<(), Error> {
        if self.ended {
            Err(Error::StateViolation)
        } else {
            Ok(())
        }
    }

    pub fn set_pipeline(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn set_bind_group(&mut self, index: u32, group_present: bool) -> Result<(), Error> {
        self.check_active()?;
        if index > 3 || !group_present {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    pub fn set_vertex_buffer(&mut self, _slot: u32) -> Result<(), Error> {
        self.check_active()
    }

    pub fn set_index_buffer(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn set_viewport(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn set_scissor_rect(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn set_blend_constant(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn set_stencil_reference(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn draw(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn draw_indexed(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn draw_indirect(&mut self, indirect_offset: u64, buffer_present: bool) -> Result<(), Error> {
        self.check_active()?;
        if !buffer_present {
            return Err(Error::InvalidArgument);
        }
        validate_indirect_offset(indirect_offset)
    }

    pub fn draw_indexed_indirect(&mut self, indirect_offset: u64, buffer_present: bool) -> Result<(), Error> {
        self.check_active()?;
        if !buffer_present {
            return Err(Error::InvalidArgument);
        }
        validate_indirect_offset(indirect_offset)
    }

    /// Idempotent.
    pub fn end(&mut self) {
        if !self.ended {
            self.ended = true;
            self.encoder.end_pass();
        }
    }
}

pub struct ComputePassEncoder<'a> {
    encoder: &'a mut CommandEncoder,
    ended: bool,
}

impl<'a> ComputePassEncoder<'a> {
    fn check_active(&self) -> Result<(), Error> {
        if self.ended {
            Err(Error::StateViolation)
        } else {
            Ok(())
        }
    }

    pub fn set_pipeline(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn set_bind_group(&mut self, index: u32, group_present: bool) -> Result<(), Error> {
        self.check_active()?;
        if index > 3 || !group_present {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    pub fn dispatch(&mut self) -> Result<(), Error> {
        self.check_active()
    }

    pub fn dispatch_indirect(&mut self, indirect_offset: u64, buffer_present: bool) -> Result<(), Error> {
        self.check_active()?;
        if !buffer_present {
            return Err(Error::InvalidArgument);
        }
        validate_indirect_offset(indirect_offset)
    }

    /// Idempotent.
    pub fn end(&mut self) {
        if !self.ended {
            self.ended = true;
            self.encoder.end_pass();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_pass_locks_and_end_unlocks() {
        let mut encoder = CommandEncoder::new();
        assert_eq!(encoder.state(), EncoderState::Recording);
        {
            let mut pass = encoder.begin_render_pass().unwrap();
            pass.draw().unwrap();
            pass.end();
            pass.end(); // idempotent
        }
        assert_eq!(encoder.state(), EncoderState::Recording);
    }

    #[test]
    fn cannot_begin_two_passes_at_once() {
        let mut encoder = CommandEncoder::new();
        let _pass = encoder.begin_render_pass().unwrap();
        assert!(matches!(encoder.begin_compute_pass(), Err(Error::StateViolation)));
    }

    #[test]
    fn finish_requires_no_active_pass() {
        let mut encoder = CommandEncoder::new();
        let mut pass = encoder.begin_render_pass().unwrap();
        pass.end();
        assert!(encoder.finish().is_ok());
        assert_eq!(encoder.state(), EncoderState::Finished);
    }

    #[test]
    fn mark_consumed_requires_finished_state() {
        let mut encoder = CommandEncoder::new();
        assert!(matches!(encoder.mark_consumed(), Err(Error::StateViolation)));
        encoder.finish().unwrap();
        assert!(encoder.mark_consumed().is_ok());
        assert_eq!(encoder.state(), EncoderState::Consumed);
    }

    #[test]
    fn bind_group_index_above_three_is_rejected() {
        let mut encoder = CommandEncoder::new();
        let mut pass = encoder.begin_render_pass().unwrap();
        assert!(pass.set_bind_group(3, true).is_ok());
        assert!(matches!(pass.set_bind_group(4, true), Err(Error::InvalidArgument)));
    }

    #[test]
    fn copy_validates_alignment_and_bounds() {
        let encoder = CommandEncoder::new();
        assert!(encoder.copy_buffer_to_buffer(true, true, 0, 0, 16, 64, 64).is_ok());
        assert!(matches!(
            encoder.copy_buffer_to_buffer(true, true, 1, 0, 16, 64, 64),
            Err(Error::OffsetUnaligned)
        ));
        assert!(matches!(
            encoder.copy_buffer_to_buffer(true, true, 0, 0, 3, 64, 64),
            Err(Error::SizeUnaligned)
        ));
        assert!(matches!(
            encoder.copy_buffer_to_buffer(true, true, 60, 0, 16, 64, 64),
            Err(Error::OutOfBounds)
        ));
        assert!(matches!(encoder.copy_buffer_to_buffer(false, true, 0, 0, 16, 64, 64), Err(Error::InvalidArgument)));
    }

    #[test]
    fn clear_buffer_zero_size_means_to_end_of_buffer() {
        let encoder = CommandEncoder::new();
        let effective = encoder.clear_buffer(true, 16, 0, 64).unwrap();
        assert_eq!(effective, 48);
    }
}
