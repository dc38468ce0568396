//! zstd backend: single-frame zstd via the `zstd` crate.
//!
//! Level 0 (unspecified) means "use zstd's own default", which is level 3.

use std::io::{self, Read, Write};

use super::{native_error, CompressionBackend, CountingReader, CountingWriter};
use crate::error::BackendError;
use crate::level::Level;

pub struct Zstd;

impl CompressionBackend for Zstd {
    fn name(&self) -> &'static str {
        "zstd"
    }

    fn id(&self) -> u8 {
        4
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
        let compression_level = level.project(1, 22, 3) as i32;
        let mut counting = CountingReader::new(reader);
        let mut encoder = zstd::stream::write::Encoder::new(writer, compression_level)
            .map_err(|e| native_error("zstd", e))?;
        io::copy(&mut counting, &mut encoder).map_err(|e| native_error("zstd", e))?;
        encoder.finish().map_err(|e| native_error("zstd", e))?;
        Ok(counting.count())
    }

    fn decompress_stream(
        &self,
        reader: &mut dyn Read,
        writer: &mut dyn Write,
    ) -> Result<u64, BackendError> {
        let mut decoder = zstd::stream::read::Decoder::new(reader).map_err(|e| native_error("zstd", e))?;
        let mut counting = CountingWriter::new(writer);
        io::copy(&mut decoder, &mut counting).map_err(|e| native_error("zstd", e))?;
        Ok(counting.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let backend = Zstd;
        let input = b"the quick brown fox jumps over the lazy dog".repeat(200);
        let compressed = backend.compress(&input, Level::Unspecified).unwrap();
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input_round_trips() {
        let backend = Zstd;
        let compressed = backend.compress(&[], Level::Value(0)).unwrap();
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
