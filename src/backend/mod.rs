//! Codec backends
//!
//! Each backend is a zero-sized type implementing [`CompressionBackend`], gated
//! behind its own Cargo feature so a build may ship a subset. Selection between
//! backends happens by tag at runtime (see [`crate::registry`]), not by
//! compile-time dispatch, because the set of enabled backends varies per build.

#[cfg(feature = "zlib")]
pub mod zlib;

#[cfg(feature = "bzip2")]
pub mod bzip2;

#[cfg(feature = "lzma")]
pub mod lzma;

#[cfg(feature = "zstd")]
pub mod zstd;

#[cfg(feature = "lz4")]
pub mod lz4;

#[cfg(feature = "snappy")]
pub mod snappy;

use std::io::{self, Read, Write};

use crate::error::BackendError;
use crate::level::Level;

/// Capability snapshot for one backend, returned by [`crate::get_capabilities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    pub name: &'static str,
    pub id: u8,
    pub has_buffer: bool,
    pub has_stream: bool,
    pub available: bool,
}

/// Uniform capability contract every codec backend implements.
///
/// Backends are stateless: a stream call wires the native codec directly over
/// the caller's reader/writer and never buffers a whole file itself. The
/// pipeline supplies chunking, progress reporting, and backpressure; a
/// backend never needs to hold state across calls.
pub trait CompressionBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn id(&self) -> u8;
    fn has_buffer(&self) -> bool;
    fn has_stream(&self) -> bool;

    /// Whether this backend can actually be used right now. Every backend
    /// compiled into the binary (gated by its Cargo feature) links against a
    /// statically-available codec, so this is `true` for everything the
    /// registry enumerates; the method exists so callers have a single place
    /// to check readiness without assuming "compiled in" implies "usable".
    fn available(&self) -> bool;

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            name: self.name(),
            id: self.id(),
            has_buffer: self.has_buffer(),
            has_stream: self.has_stream(),
            available: self.available(),
        }
    }

    /// Stream-compress `reader` into `writer` at the given level, returning
    /// the number of input bytes consumed. Implementations wire the native
    /// codec's own `Read`/`Write` adapter directly over the supplied
    /// reader/writer; neither side is buffered into memory in full.
    fn compress_stream(
        &self,
        reader: &mut dyn Read,
        writer: &mut dyn Write,
        level: Level,
    ) -> Result<u64, BackendError>;

    /// Stream-decompress `reader` into `writer`, returning the number of
    /// decoded bytes written.
    fn decompress_stream(
        &self,
        reader: &mut dyn Read,
        writer: &mut dyn Write,
    ) -> Result<u64, BackendError>;

    /// Buffer convenience built on the streaming contract above: compress the
    /// whole of `input` and return the compressed bytes.
    fn compress(&self, input: &[u8], level: Level) -> Result<Vec<u8>, BackendError> {
        let mut reader = input;
        let mut out = Vec::new();
        self.compress_stream(&mut reader, &mut out, level)?;
        Ok(out)
    }

    /// Buffer convenience built on the streaming contract above: decompress
    /// the whole of `input`, appending the decoded bytes to `out`.
    fn decompress(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), BackendError> {
        let mut reader = input;
        self.decompress_stream(&mut reader, out)?;
        Ok(())
    }
}

pub(crate) fn native_error(backend: &'static str, err: impl std::fmt::Display) -> BackendError {
    BackendError::Native { backend, msg: err.to_string() }
}

/// Wraps a reader, counting the bytes pulled through it. Used to learn
/// `orig_size` (compress) without buffering the source file.
pub(crate) struct CountingReader<'a> {
    inner: &'a mut dyn Read,
    count: u64,
}

impl<'a> CountingReader<'a> {
    pub(crate) fn new(inner: &'a mut dyn Read) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn count(&self) -> u64 {
        self.count
    }
}

impl<'a> Read for CountingReader<'a> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// Wraps a writer, counting the bytes pushed through it. Used to learn the
/// decoded byte count (decompress) without buffering the destination file.
pub(crate) struct CountingWriter<'a> {
    inner: &'a mut dyn Write,
    count: u64,
}

impl<'a> CountingWriter<'a> {
    pub(crate) fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn count(&self) -> u64 {
        self.count
    }
}

impl<'a> Write for CountingWriter<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
