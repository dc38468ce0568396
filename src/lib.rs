//! `compresso`: a multi-codec file compression library.
//!
//! Wraps a fixed set of compression backends (zlib, bzip2, lzma, zstd, lz4,
//! snappy) behind one file-level interface that writes a self-describing
//! container: [`compress_file`] picks a backend (by name, or by a coarse
//! [`Strategy`] heuristic) and streams `src` into a container at `dest`;
//! [`decompress_file`] reads the container's header back out and reverses
//! it. [`inspect`] parses just the header, without touching the payload.

pub mod backend;
pub mod container;
pub mod error;
pub mod inspect;
pub mod level;
pub mod pipeline;
pub mod registry;
pub mod speed_cache;

pub use backend::BackendCapabilities;
pub use error::{BackendError, CompressoError, HeaderError};
pub use inspect::{inspect, InspectResult};
pub use level::{Level, Strategy};
pub use pipeline::{
    compress_file, compress_file_with_progress, decompress_file, decompress_file_with_progress,
};
pub use speed_cache::{get_estimated_speeds, Operation};

/// List the capabilities of every compression backend compiled into this
/// build, in stable registration order.
pub fn get_capabilities() -> Vec<BackendCapabilities> {
    registry::list()
}
