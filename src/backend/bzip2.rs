//! bzip2 backend: block-sorted compression via the `bzip2` crate.
//!
//! Level maps to blockSize100k in 1-9. `BzEncoder`/`BzDecoder` are `Read`
//! adapters like every other backend here, so bzip2 streams through a file
//! the same way zlib and xz do despite being a block-based codec internally.

use std::io::{self, Read, Write};

use bzip2::read::{BzDecoder, BzEncoder};
use bzip2::Compression;

use super::{native_error, CompressionBackend, CountingReader, CountingWriter};
use crate::error::BackendError;
use crate::level::Level;

pub struct Bzip2;

impl CompressionBackend for Bzip2 {
    fn name(&self) -> &'static str {
        "bzip2"
    }

    fn id(&self) -> u8 {
        2
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
        let block_size_100k = level.project(1, 9, 9);
        let mut counting = CountingReader::new(reader);
        let mut encoder = BzEncoder::new(&mut counting, Compression::new(block_size_100k));
        io::copy(&mut encoder, writer).map_err(|e| native_error("bzip2", e))?;
        Ok(counting.count())
    }

    fn decompress_stream(
        &self,
        reader: &mut dyn Read,
        writer: &mut dyn Write,
    ) -> Result<u64, BackendError> {
        let mut decoder = BzDecoder::new(reader);
        let mut counting = CountingWriter::new(writer);
        io::copy(&mut decoder, &mut counting).map_err(|e| native_error("bzip2", e))?;
        Ok(counting.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let backend = Bzip2;
        let input = b"the quick brown fox jumps over the lazy dog".repeat(100);
        let compressed = backend.compress(&input, Level::Value(9)).unwrap();
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input_round_trips() {
        let backend = Bzip2;
        let compressed = backend.compress(&[], Level::Unspecified).unwrap();
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
