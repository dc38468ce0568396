//! Errors

use std::io;

use thiserror::Error;

/// Errors from parsing or validating a container header
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    #[error("file too small to be a compresso container")]
    TooSmall,

    #[error("not a compresso file")]
    BadMagic,

    #[error("unsupported version {0}")]
    UnsupportedVersion(u8),

    #[error("unknown algorithm id {0}")]
    UnknownAlgoId(u8),
}

/// Errors from a codec backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{backend}: {msg}")]
    Native { backend: &'static str, msg: String },

    #[error("size mismatch: expected {expected}, got {got}")]
    SizeMismatch { expected: u64, got: u64 },

    #[error("backend unavailable for algorithm id {0}")]
    Unavailable(u8),
}

/// Errors generated from the library
#[derive(Error, Debug)]
pub enum CompressoError {
    #[error("std io error: {0}")]
    StdIo(#[from] io::Error),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("level out of range: {0} (expected 0-9)")]
    InvalidLevel(u8),

    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    #[error("no compiled-in backend available")]
    NoBackendAvailable,
}

impl From<CompressoError> for io::Error {
    fn from(value: CompressoError) -> Self {
        use CompressoError::*;
        match value {
            StdIo(io) => io,
            e @ Header(_) => Self::new(io::ErrorKind::InvalidData, e),
            e @ Backend(_) => Self::new(io::ErrorKind::InvalidData, e),
            e @ InvalidLevel(_) => Self::new(io::ErrorKind::InvalidInput, e),
            e @ UnknownBackend(_) => Self::new(io::ErrorKind::InvalidInput, e),
            e @ NoBackendAvailable => Self::new(io::ErrorKind::Unsupported, e),
        }
    }
}
