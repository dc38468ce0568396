//! Router / registry: name<->id mapping, capability enumeration, heuristic
//! selection over the backends compiled into this build.

use std::sync::OnceLock;

use crate::backend::{BackendCapabilities, CompressionBackend};
use crate::level::Strategy;

#[cfg(feature = "zlib")]
use crate::backend::zlib::Zlib;
#[cfg(feature = "bzip2")]
use crate::backend::bzip2::Bzip2;
#[cfg(feature = "lzma")]
use crate::backend::lzma::Lzma;
#[cfg(feature = "zstd")]
use crate::backend::zstd::Zstd;
#[cfg(feature = "lz4")]
use crate::backend::lz4::Lz4;
#[cfg(feature = "snappy")]
use crate::backend::snappy::Snappy;

static REGISTRY: OnceLock<Vec<&'static dyn CompressionBackend>> = OnceLock::new();

fn backends() -> &'static [&'static dyn CompressionBackend] {
    REGISTRY.get_or_init(|| {
        #[allow(unused_mut)]
        let mut v: Vec<&'static dyn CompressionBackend> = Vec::new();
        #[cfg(feature = "zlib")]
        v.push(&Zlib);
        #[cfg(feature = "bzip2")]
        v.push(&Bzip2);
        #[cfg(feature = "lzma")]
        v.push(&Lzma);
        #[cfg(feature = "zstd")]
        v.push(&Zstd);
        #[cfg(feature = "lz4")]
        v.push(&Lz4);
        #[cfg(feature = "snappy")]
        v.push(&Snappy);
        v
    })
}

/// List the capabilities of every compiled-in backend, in stable registration
/// order.
pub fn list() -> Vec<BackendCapabilities> {
    backends().iter().map(|b| b.capabilities()).collect()
}

/// Case-insensitive exact match on backend name.
pub fn by_name(name: &str) -> Option<&'static dyn CompressionBackend> {
    backends().iter().copied().find(|b| b.name().eq_ignore_ascii_case(name))
}

/// Exact match on the persisted numeric id.
pub fn by_id(id: u8) -> Option<&'static dyn CompressionBackend> {
    backends().iter().copied().find(|b| b.id() == id)
}

/// Apply the strategy's preference order and return the first compiled-in
/// backend, or `None` if this build has no backends at all.
pub fn choose(strategy: Strategy) -> Option<&'static dyn CompressionBackend> {
    strategy.preference_order().iter().find_map(|name| by_name(name))
}
