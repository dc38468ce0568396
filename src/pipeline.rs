//! Streamed encode/decode pipeline: chunked file->codec->file transform.
//!
//! Every backend in [`crate::backend`] wires the native codec's own
//! `Read`/`Write` adapter (`flate2::read::ZlibEncoder`, `bzip2::read::BzEncoder`,
//! `xz2::read::XzEncoder`, `zstd::stream::write::Encoder`,
//! `lz4_flex::frame::FrameEncoder`, `snap::write::FrameEncoder`, and their
//! decoder counterparts) directly over the reader/writer this pipeline
//! supplies, so a file is streamed through the codec in bounded memory — no
//! full-file buffer sits in this module or in the backend. [`ProgressReader`]
//! caps every underlying read at [`CHUNK_SIZE`] and reports cumulative bytes
//! consumed so a caller can drive a progress bar without the core depending
//! on a UI crate.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, trace};

use crate::backend::CompressionBackend;
use crate::container::{self, Header};
use crate::error::{BackendError, CompressoError};
use crate::level::{Level, Strategy};
use crate::registry;

/// Upper bound on the size of a single underlying read while streaming a
/// file through a backend; also the progress-reporting granularity.
pub const CHUNK_SIZE: usize = 64 * 1024;

fn resolve_backend(
    algo: Option<&str>,
    strategy: Strategy,
) -> Result<&'static dyn CompressionBackend, CompressoError> {
    if let Some(name) = algo {
        return registry::by_name(name)
            .ok_or_else(|| CompressoError::UnknownBackend(name.to_string()));
    }
    registry::choose(strategy).ok_or(CompressoError::NoBackendAvailable)
}

/// Wraps a reader, capping each underlying read at [`CHUNK_SIZE`] and
/// reporting the cumulative byte count to `on_progress` after every read.
struct ProgressReader<R, F> {
    inner: R,
    total: u64,
    on_progress: F,
}

impl<R: Read, F: FnMut(u64)> ProgressReader<R, F> {
    fn new(inner: R, on_progress: F) -> Self {
        Self { inner, total: 0, on_progress }
    }
}

impl<R: Read, F: FnMut(u64)> Read for ProgressReader<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let capped = buf.len().min(CHUNK_SIZE);
        let n = self.inner.read(&mut buf[..capped])?;
        self.total += n as u64;
        (self.on_progress)(self.total);
        Ok(n)
    }
}

/// Compress `src` into `dest` through the chosen backend, writing a
/// self-describing container.
///
/// `algo`, when given, overrides `strategy`-based heuristic selection.
/// `dest` must be a regular, seekable file: the pipeline writes a
/// provisional header before the final size is known and seeks back to
/// rewrite it once the payload is flushed.
pub fn compress_file(
    src: &Path,
    dest: &Path,
    algo: Option<&str>,
    strategy: Strategy,
    level: Level,
) -> Result<(), CompressoError> {
    compress_file_with_progress(src, dest, algo, strategy, level, |_| {})
}

/// Same as [`compress_file`], additionally invoking `on_progress` after each
/// bounded read from `src` with the cumulative byte count consumed so far.
pub fn compress_file_with_progress(
    src: &Path,
    dest: &Path,
    algo: Option<&str>,
    strategy: Strategy,
    level: Level,
    on_progress: impl FnMut(u64),
) -> Result<(), CompressoError> {
    let backend = resolve_backend(algo, strategy)?;
    debug!(backend = backend.name(), ?level, "compressing file");

    let result = (|| -> Result<(), CompressoError> {
        let mut reader = ProgressReader::new(BufReader::new(File::open(src)?), on_progress);
        let mut writer = BufWriter::new(File::create(dest)?);

        let provisional = Header::new(backend.id(), level, 0);
        container::write_header(&mut writer, &provisional)?;

        let total_in = backend.compress_stream(&mut reader, &mut writer, level)?;
        trace!(total_in, "compressed payload");

        writer.flush()?;
        let mut file = writer.into_inner().map_err(|e| e.into_error())?;
        file.seek(SeekFrom::Start(0))?;
        let final_header = Header::new(backend.id(), level, total_in);
        container::write_header(&mut file, &final_header)?;
        file.flush()?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(dest);
    }
    result
}

/// Decompress `src` (a container written by [`compress_file`]) into `dest`,
/// verifying that the decoded byte count matches the header's `orig_size`.
///
/// `algo`, when given, overrides the backend resolved from the header's
/// `algo_id`; the caller is responsible for any resulting mismatch.
pub fn decompress_file(src: &Path, dest: &Path, algo: Option<&str>) -> Result<(), CompressoError> {
    decompress_file_with_progress(src, dest, algo, |_| {})
}

/// Same as [`decompress_file`], additionally invoking `on_progress` after
/// each bounded read from `src` with the cumulative compressed byte count
/// consumed so far.
pub fn decompress_file_with_progress(
    src: &Path,
    dest: &Path,
    algo: Option<&str>,
    on_progress: impl FnMut(u64),
) -> Result<(), CompressoError> {
    let result = (|| -> Result<(), CompressoError> {
        let mut header_reader = BufReader::new(File::open(src)?);
        let header = container::read_header(&mut header_reader)?;

        let backend = match algo {
            Some(name) => registry::by_name(name)
                .ok_or_else(|| CompressoError::UnknownBackend(name.to_string()))?,
            None => registry::by_id(header.algo_id)
                .ok_or(BackendError::Unavailable(header.algo_id))?,
        };
        debug!(backend = backend.name(), orig_size = header.orig_size, "decompressing file");

        let mut reader = ProgressReader::new(header_reader, on_progress);
        let mut writer = BufWriter::new(File::create(dest)?);
        let got = backend.decompress_stream(&mut reader, &mut writer)?;

        if got != header.orig_size {
            return Err(BackendError::SizeMismatch { expected: header.orig_size, got }.into());
        }

        writer.flush()?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(dest);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_src(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn round_trip_each_backend_and_level() {
        let dir = tempdir().unwrap();
        let caps = registry::list();
        let inputs: Vec<Vec<u8>> = vec![
            vec![],
            vec![0x42],
            b"x".repeat(CHUNK_SIZE),
            b"y".repeat(CHUNK_SIZE + 1),
            b"ascii text payload ".repeat(5000),
        ];
        let levels =
            [Level::Unspecified, Level::Value(0), Level::Value(3), Level::Value(6), Level::Value(9)];

        for cap in &caps {
            for level in levels {
                for (i, input) in inputs.iter().enumerate() {
                    let src = write_src(dir.path(), &format!("src_{}_{}", cap.name, i), input);
                    let dest = dir.path().join(format!("dst_{}_{}.cmp", cap.name, i));
                    let out = dir.path().join(format!("out_{}_{}", cap.name, i));

                    compress_file(&src, &dest, Some(cap.name), Strategy::Balanced, level).unwrap();
                    decompress_file(&dest, &out, None).unwrap();

                    let roundtripped = fs::read(&out).unwrap();
                    assert_eq!(&roundtripped, input, "backend {} level {:?}", cap.name, level);
                }
            }
        }
    }

    #[test]
    fn progress_callback_reaches_full_length() {
        let dir = tempdir().unwrap();
        let input = b"ascii text payload ".repeat(10_000);
        let src = write_src(dir.path(), "src", &input);
        let dest = dir.path().join("dest.cmp");
        let out = dir.path().join("dest.out");

        let mut last_seen = 0u64;
        compress_file_with_progress(&src, &dest, Some("zlib"), Strategy::Balanced, Level::Unspecified, |n| {
            last_seen = n;
        })
        .unwrap();
        assert_eq!(last_seen, input.len() as u64);

        let mut last_seen = 0u64;
        decompress_file_with_progress(&dest, &out, None, |n| {
            last_seen = n;
        })
        .unwrap();
        assert!(last_seen > 0);
    }

    #[test]
    fn empty_file_produces_orig_size_zero() {
        let dir = tempdir().unwrap();
        let src = write_src(dir.path(), "empty", b"");
        let dest = dir.path().join("empty.cmp");
        let out = dir.path().join("empty.out");

        compress_file(&src, &dest, None, Strategy::Balanced, Level::Unspecified).unwrap();

        let mut f = File::open(&dest).unwrap();
        let header = container::read_header(&mut f).unwrap();
        assert_eq!(header.orig_size, 0);

        decompress_file(&dest, &out, None).unwrap();
        assert_eq!(fs::read(&out).unwrap(), b"");
    }

    #[test]
    fn truncated_payload_fails_and_removes_dest() {
        let dir = tempdir().unwrap();
        let src = write_src(dir.path(), "src", b"some data that compresses");
        let dest = dir.path().join("trunc.cmp");
        let out = dir.path().join("trunc.out");

        compress_file(&src, &dest, Some("zlib"), Strategy::Balanced, Level::Unspecified).unwrap();

        let mut bytes = fs::read(&dest).unwrap();
        bytes.pop();
        fs::write(&dest, &bytes).unwrap();

        let result = decompress_file(&dest, &out, None);
        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn bad_magic_is_rejected_and_leaves_no_dest() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("not-a-container");
        fs::write(&src, b"NOTCOMP-this-is-not-a-valid-header-at-all").unwrap();
        let out = dir.path().join("out");

        let result = decompress_file(&src, &out, None);
        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let dir = tempdir().unwrap();
        let src = write_src(dir.path(), "src", b"payload");
        let dest = dir.path().join("v2.cmp");
        compress_file(&src, &dest, Some("zlib"), Strategy::Balanced, Level::Unspecified).unwrap();

        let mut bytes = fs::read(&dest).unwrap();
        bytes[4] = 2;
        fs::write(&dest, &bytes).unwrap();

        let out = dir.path().join("v2.out");
        let result = decompress_file(&dest, &out, None);
        assert!(result.is_err());
        assert!(!out.exists());
    }

    #[test]
    fn level_clamping_rejects_before_any_io() {
        let dir = tempdir().unwrap();
        let src = write_src(dir.path(), "src", b"payload");
        let dest = dir.path().join("should-not-exist.cmp");

        let level = Level::from_value(10);
        assert!(level.is_err());
        assert!(!dest.exists());
        let _ = src;
    }
}
