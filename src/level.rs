//! Compression level and selection strategy

use crate::error::CompressoError;

/// Compression effort, 0-9, or "use the backend default".
///
/// Persisted in the container header as `0xFF` for [`Level::Unspecified`], and
/// verbatim otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Unspecified,
    Value(u8),
}

impl Level {
    pub(crate) const UNSPECIFIED_BYTE: u8 = 0xFF;

    /// Build a `Level` from a caller-supplied integer, rejecting anything
    /// outside `0..=9`.
    pub fn from_value(level: u8) -> Result<Self, CompressoError> {
        if level > 9 {
            return Err(CompressoError::InvalidLevel(level));
        }
        Ok(Level::Value(level))
    }

    /// Decode the byte persisted in the container header.
    pub(crate) fn from_byte(byte: u8) -> Self {
        if byte == Self::UNSPECIFIED_BYTE {
            Level::Unspecified
        } else {
            Level::Value(byte)
        }
    }

    /// Encode for the container header.
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            Level::Unspecified => Self::UNSPECIFIED_BYTE,
            Level::Value(v) => v,
        }
    }

    /// Project the 0-9 scale onto `default` when unspecified, or onto
    /// `low..=high` (inclusive) otherwise, clamping to the native range.
    pub(crate) fn project(self, low: u32, high: u32, default: u32) -> u32 {
        match self {
            Level::Unspecified => default,
            Level::Value(v) => {
                let v = v.min(9) as u32;
                low + (v * (high - low)) / 9
            }
        }
    }
}

/// Coarse automatic-selection preference, used only when the caller does not
/// name an algorithm explicitly. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Fast,
    #[default]
    Balanced,
    MaxRatio,
}

impl Strategy {
    /// Backend names in preference order, highest priority first.
    pub(crate) fn preference_order(self) -> &'static [&'static str] {
        match self {
            Strategy::Fast => &["lz4", "snappy", "zstd", "zlib", "bzip2", "lzma"],
            Strategy::Balanced => &["zstd", "zlib", "bzip2", "lzma", "lz4", "snappy"],
            Strategy::MaxRatio => &["bzip2", "lzma", "zstd", "zlib", "lz4", "snappy"],
        }
    }
}
