//! Inspector: parse a container header without decompressing the payload.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::container::{self, HEADER_LEN};
use crate::level::Level;
use crate::registry;
use crate::speed_cache::{self, Operation};

/// Result of inspecting a file for compresso container structure.
#[derive(Debug, Clone)]
pub struct InspectResult {
    pub path: PathBuf,

    pub is_compresso: bool,
    pub header_ok: bool,
    pub reason: Option<String>,

    pub version: Option<u8>,
    pub algo_id: Option<u8>,
    pub algo_name: Option<String>,
    pub level: Option<u8>,
    pub flags: Option<u8>,
    pub orig_size: Option<u64>,

    pub backend_available: bool,
    pub has_streaming: bool,

    pub can_decompress: bool,
    pub estimated_decomp_s: Option<f64>,
}

impl InspectResult {
    fn not_recognized(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            is_compresso: false,
            header_ok: false,
            reason: Some(reason.into()),
            version: None,
            algo_id: None,
            algo_name: None,
            level: None,
            flags: None,
            orig_size: None,
            backend_available: false,
            has_streaming: false,
            can_decompress: false,
            estimated_decomp_s: None,
        }
    }
}

/// Inspect `path`, reading at most [`HEADER_LEN`] bytes. Never raises: a
/// missing file, a truncated header, or a bad magic/version is reported via
/// `is_compresso`/`header_ok`/`reason` rather than an error.
pub fn inspect(path: &Path) -> InspectResult {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return InspectResult::not_recognized(path, format!("failed to open file: {e}")),
    };

    let mut buf = [0u8; HEADER_LEN];
    let n = match file.read(&mut buf) {
        Ok(n) => n,
        Err(e) => return InspectResult::not_recognized(path, format!("failed to read file: {e}")),
    };
    if n < HEADER_LEN {
        return InspectResult::not_recognized(path, "file too small to be a compresso file");
    }

    let header = match container::read_header(&mut &buf[..]) {
        Ok(h) => h,
        Err(e) => {
            let version = if buf[0..4] == container::MAGIC { Some(buf[4]) } else { None };
            return InspectResult {
                path: path.to_path_buf(),
                is_compresso: buf[0..4] == container::MAGIC,
                header_ok: false,
                reason: Some(e.to_string()),
                version,
                algo_id: None,
                algo_name: None,
                level: None,
                flags: None,
                orig_size: None,
                backend_available: false,
                has_streaming: false,
                can_decompress: false,
                estimated_decomp_s: None,
            };
        }
    };

    let backend = registry::by_id(header.algo_id);
    let backend_available = backend.is_some();
    let algo_name = backend.map(|b| b.name().to_string());
    let has_streaming = backend.map(|b| b.has_stream()).unwrap_or(false);
    let can_decompress = backend_available;

    let level = match header.level {
        Level::Unspecified => None,
        Level::Value(v) => Some(v),
    };

    let reason = if can_decompress { None } else { Some("no available backend for this algorithm".to_string()) };

    let estimated_decomp_s = if can_decompress && header.orig_size > 0 {
        algo_name.as_deref().map(|name| {
            let mb_s = speed_cache::get_estimated_speeds(name, Operation::Decompress);
            header.orig_size as f64 / (mb_s * 1024.0 * 1024.0)
        })
    } else {
        None
    };

    InspectResult {
        path: path.to_path_buf(),
        is_compresso: true,
        header_ok: true,
        reason,
        version: Some(container::VERSION),
        algo_id: Some(header.algo_id),
        algo_name,
        level,
        flags: Some(header.flags),
        orig_size: Some(header.orig_size),
        backend_available,
        has_streaming,
        can_decompress,
        estimated_decomp_s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Strategy;
    use crate::pipeline::compress_file;
    use tempfile::tempdir;

    #[test]
    fn inspect_recognizes_valid_container() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::write(&src, b"hello world\n").unwrap();
        let dest = dir.path().join("dest.cmp");
        compress_file(&src, &dest, Some("zlib"), Strategy::Balanced, Level::Value(6)).unwrap();

        let result = inspect(&dest);
        assert!(result.is_compresso);
        assert!(result.header_ok);
        assert_eq!(result.algo_name.as_deref(), Some("zlib"));
        assert_eq!(result.orig_size, Some(12));
        assert!(result.can_decompress);
    }

    #[test]
    fn inspect_reports_bad_magic_without_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not-a-container");
        std::fs::write(&path, b"this is definitely not a header at all!!").unwrap();
        let result = inspect(&path);
        assert!(!result.is_compresso);
        assert!(!result.header_ok);
        assert!(result.reason.is_some());
    }

    #[test]
    fn inspect_reports_missing_file_without_error() {
        let result = inspect(Path::new("/nonexistent/path/should/not/exist"));
        assert!(!result.is_compresso);
        assert!(result.reason.is_some());
    }

    #[test]
    fn inspect_reads_at_most_header_len_bytes() {
        // A struct-level guarantee: `inspect` only ever calls `read` once for
        // `HEADER_LEN` bytes, regardless of how large the rest of the file
        // is. We approximate "purity" here by checking a multi-megabyte file
        // still inspects instantly and correctly.
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        std::fs::write(&src, vec![0u8; 2 * 1024 * 1024]).unwrap();
        let dest = dir.path().join("big.cmp");
        compress_file(&src, &dest, Some("zlib"), Strategy::Balanced, Level::Unspecified).unwrap();

        let result = inspect(&dest);
        assert!(result.header_ok);
        assert_eq!(result.orig_size, Some(2 * 1024 * 1024));
    }
}
