//! zlib backend: raw zlib stream (not gzip), via `flate2`.

use std::io::{self, Read, Write};

use flate2::read::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;

use super::{native_error, CompressionBackend, CountingReader, CountingWriter};
use crate::error::BackendError;
use crate::level::Level;

pub struct Zlib;

impl CompressionBackend for Zlib {
    fn name(&self) -> &'static str {
        "zlib"
    }

    fn id(&self) -> u8 {
        1
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
        let compression = match level {
            Level::Value(0) => Compression::none(),
            _ => Compression::new(level.project(1, 9, 6)),
        };
        let mut counting = CountingReader::new(reader);
        let mut encoder = ZlibEncoder::new(&mut counting, compression);
        io::copy(&mut encoder, writer).map_err(|e| native_error("zlib", e))?;
        Ok(counting.count())
    }

    fn decompress_stream(
        &self,
        reader: &mut dyn Read,
        writer: &mut dyn Write,
    ) -> Result<u64, BackendError> {
        let mut decoder = ZlibDecoder::new(reader);
        let mut counting = CountingWriter::new(writer);
        io::copy(&mut decoder, &mut counting).map_err(|e| native_error("zlib", e))?;
        Ok(counting.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let backend = Zlib;
        let input = b"the quick brown fox jumps over the lazy dog".repeat(100);
        let compressed = backend.compress(&input, Level::Unspecified).unwrap();
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn level_zero_is_store_equivalent() {
        let backend = Zlib;
        let input = b"abc".to_vec();
        let compressed = backend.compress(&input, Level::Value(0)).unwrap();
        let mut out = Vec::new();
        backend.decompress(&compressed, &mut out).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn compress_stream_reports_input_byte_count() {
        let backend = Zlib;
        let input = b"the quick brown fox jumps over the lazy dog".repeat(50);
        let mut reader: &[u8] = &input;
        let mut out = Vec::new();
        let n = backend.compress_stream(&mut reader, &mut out, Level::Unspecified).unwrap();
        assert_eq!(n, input.len() as u64);
    }
}
