//! lz4 backend: lz4 frame format (not raw block), via `lz4_flex`.
//!
//! `lz4_flex` implements the fast LZ4 codec only; it has no true "high
//! compression" (HC) mode to switch into at level >= 7, unlike the reference
//! C library. We approximate the effect of a higher level by widening the
//! frame's block size (larger blocks give the LZ77 match finder more
//! context per block, at the cost of more memory), via
//! [`frame_info_for_level`], rather than silently discarding the level.

use std::io::{self, Read, Write};

use lz4_flex::frame::{BlockMode, BlockSize, FrameDecoder, FrameEncoder, FrameInfo};

use super::{native_error, CompressionBackend, CountingReader, CountingWriter};
use crate::error::BackendError;
use crate::level::Level;

pub struct Lz4;

fn frame_info_for_level(level: Level) -> FrameInfo {
    let block_size = match level.project(1, 9, 1) {
        1..=3 => BlockSize::Max64KB,
        4..=6 => BlockSize::Max256KB,
        7..=8 => BlockSize::Max1MB,
        _ => BlockSize::Max4MB,
    };

    FrameInfo::new().block_mode(BlockMode::Linked).block_size(block_size).content_checksum(true)
}

impl CompressionBackend for Lz4 {
    fn name(&self) -> &'static str {
        "lz4"
    }

    fn id(&self) -> u8 {
        5
    }

    fn has_buffer(&self) -> bool {
        true
    }

    fn has_stream(&self) -> bool {
        true
    }

    fn available(&self) -> bool {
        true
    }

    fn compress_stream(
        &self,
        reader: &mut dyn Read,
        writer: &mut dyn Write,
        level: Level,
    ) -> Result<u64, BackendError> {
        let mut counting = CountingReader::new(reader);
        let frame_info = frame_info_for_level(level);
        let mut encoder = FrameEncoder::with_frame_info(frame_info, writer);
        io::copy(&mut counting, &mut encoder).map_err(|e| native_error("lz4", e))?;
        encoder.finish().map_err(|e| native_error("lz4", e))?;
        Ok(counting.count())
    }

    fn decompress_stream(
        &self,
        reader: &mut dyn Read,
        writer: &mut dyn Write,
    ) -> Result<u64, BackendError> {
        let mut decoder = FrameDecoder::new(reader);
        let mut counting = CountingWriter::new(writer);
        io::copy(&mut decoder, &mut counting).map_err(|e| native_error("lz4", e))?;
        Ok(counting.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let backend = Lz4;
        let input = b"the quick brown fox jumps over the lazy dog".repeat(100);
        let compressed = backend.compress(&input, Level::Value(9)).unwrap();
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input_round_trips() {
        let backend = Lz4;
        let compressed = backend.compress(&[], Level::Unspecified).unwrap();
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn high_level_widens_block_size() {
        assert_eq!(frame_info_for_level(Level::Value(2)).block_size, BlockSize::Max64KB);
        assert_eq!(frame_info_for_level(Level::Value(7)).block_size, BlockSize::Max1MB);
        assert_eq!(frame_info_for_level(Level::Value(9)).block_size, BlockSize::Max4MB);
    }
}
