//! lzma backend: xz container (not raw lzma1), via `xz2`/liblzma.
//!
//! Level maps directly to the xz preset 0-9.

use std::io::{self, Read, Write};

use xz2::read::{XzDecoder, XzEncoder};

use super::{native_error, CompressionBackend, CountingReader, CountingWriter};
use crate::error::BackendError;
use crate::level::Level;

pub struct Lzma;

impl CompressionBackend for Lzma {
    fn name(&self) -> &'static str {
        "lzma"
    }

    fn id(&self) -> u8 {
        3
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
        let preset = level.project(0, 9, 6);
        let mut counting = CountingReader::new(reader);
        let mut encoder = XzEncoder::new(&mut counting, preset);
        io::copy(&mut encoder, writer).map_err(|e| native_error("lzma", e))?;
        Ok(counting.count())
    }

    fn decompress_stream(
        &self,
        reader: &mut dyn Read,
        writer: &mut dyn Write,
    ) -> Result<u64, BackendError> {
        let mut decoder = XzDecoder::new(reader);
        let mut counting = CountingWriter::new(writer);
        io::copy(&mut decoder, &mut counting).map_err(|e| native_error("lzma", e))?;
        Ok(counting.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let backend = Lzma;
        let input = vec![0u8; 1024 * 1024];
        let compressed = backend.compress(&input, Level::Value(9)).unwrap();
        assert!(compressed.len() < 1024, "highly compressible input should shrink a lot");
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert_eq!(out, input);
    }
}
