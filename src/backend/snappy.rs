//! snappy backend: snappy framed format, via the `snap` crate.
//!
//! Snappy has no compression level; it has a single speed/ratio point, so
//! `level` is accepted but ignored here like the reference implementation.

use std::io::{self, Read, Write};

use snap::read::FrameDecoder;
use snap::write::FrameEncoder;

use super::{native_error, CompressionBackend, CountingReader, CountingWriter};
use crate::error::BackendError;
use crate::level::Level;

pub struct Snappy;

impl CompressionBackend for Snappy {
    fn name(&self) -> &'static str {
        "snappy"
    }

    fn id(&self) -> u8 {
        6
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
        _level: Level,
    ) -> Result<u64, BackendError> {
        let mut counting = CountingReader::new(reader);
        let mut encoder = FrameEncoder::new(writer);
        io::copy(&mut counting, &mut encoder).map_err(|e| native_error("snappy", e))?;
        encoder.into_inner().map_err(|e| native_error("snappy", e.to_string()))?;
        Ok(counting.count())
    }

    fn decompress_stream(
        &self,
        reader: &mut dyn Read,
        writer: &mut dyn Write,
    ) -> Result<u64, BackendError> {
        let mut decoder = FrameDecoder::new(reader);
        let mut counting = CountingWriter::new(writer);
        io::copy(&mut decoder, &mut counting).map_err(|e| native_error("snappy", e))?;
        Ok(counting.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let backend = Snappy;
        let input = b"the quick brown fox jumps over the lazy dog".repeat(100);
        let compressed = backend.compress(&input, Level::Unspecified).unwrap();
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert_eq!(out, input);
    }
}
