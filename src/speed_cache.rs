//! Speed cache: persisted, measured compress/decompress throughputs at
//! `$HOME/.compresso/speeds.json`, read by the inspector and written only by
//! the benchmark collaborator (see `src/bin/compresso.rs`).

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which operation a speed estimate is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AlgoSpeeds {
    comp_mb_s: f64,
    decomp_mb_s: f64,
    samples: u64,
}

fn default_comp_mb_s(algo: &str) -> f64 {
    match algo {
        "zlib" => 200.0,
        "bzip2" => 50.0,
        "lzma" => 30.0,
        "zstd" => 400.0,
        "lz4" => 800.0,
        "snappy" => 600.0,
        _ => 200.0,
    }
}

fn default_decomp_mb_s(algo: &str) -> f64 {
    match algo {
        "zlib" => 250.0,
        "bzip2" => 60.0,
        "lzma" => 40.0,
        "zstd" => 500.0,
        "lz4" => 900.0,
        "snappy" => 700.0,
        _ => 200.0,
    }
}

fn speeds_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".compresso").join("speeds.json"))
}

/// Load the cache, falling back to an empty map when the file is missing or
/// malformed. Never raises.
fn load_raw() -> HashMap<String, AlgoSpeeds> {
    let Some(path) = speeds_path() else {
        return HashMap::new();
    };
    let Ok(contents) = fs::read_to_string(&path) else {
        return HashMap::new();
    };
    serde_json::from_str(&contents).unwrap_or_default()
}

fn save_raw(entries: &HashMap<String, AlgoSpeeds>) -> std::io::Result<()> {
    let Some(path) = speeds_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(entries).expect("AlgoSpeeds always serializes");
    fs::write(path, json)
}

/// Get the estimated speed, in MB/s, for `algo`/`operation`. Prefers a cached
/// measurement from the benchmark collaborator; falls back to a built-in
/// default table when no measurement exists or the cache is unreadable.
pub fn get_estimated_speeds(algo: &str, operation: Operation) -> f64 {
    let algo = algo.to_ascii_lowercase();
    let cache = load_raw();

    if let Some(entry) = cache.get(&algo) {
        let cached = match operation {
            Operation::Compress => entry.comp_mb_s,
            Operation::Decompress => entry.decomp_mb_s,
        };
        if cached > 0.0 {
            return cached;
        }
    }

    match operation {
        Operation::Compress => default_comp_mb_s(&algo),
        Operation::Decompress => default_decomp_mb_s(&algo),
    }
}

/// One measured benchmark sample for a single algorithm.
#[derive(Debug, Clone)]
pub struct Sample {
    pub algo: String,
    pub comp_mb_s: f64,
    pub decomp_mb_s: f64,
}

/// Fold new benchmark samples into the persisted cache using a
/// sample-count-weighted running average:
/// `(old.avg * old.n + new.avg * k) / (old.n + k)`.
///
/// Grouped by algorithm first so repeated samples for the same algorithm in
/// one call contribute a single combined update.
pub fn update_from_benchmarks(samples: &[Sample]) -> std::io::Result<()> {
    if samples.is_empty() {
        return Ok(());
    }

    let mut grouped: HashMap<&str, (f64, f64, u64)> = HashMap::new();
    for s in samples {
        if s.comp_mb_s <= 0.0 || s.decomp_mb_s <= 0.0 {
            continue;
        }
        let entry = grouped.entry(s.algo.as_str()).or_insert((0.0, 0.0, 0));
        entry.0 += s.comp_mb_s;
        entry.1 += s.decomp_mb_s;
        entry.2 += 1;
    }
    if grouped.is_empty() {
        return Ok(());
    }

    let mut existing = load_raw();
    for (algo, (comp_sum, decomp_sum, count)) in grouped {
        let new_comp_avg = comp_sum / count as f64;
        let new_decomp_avg = decomp_sum / count as f64;

        let updated = match existing.get(algo) {
            Some(old) if old.samples > 0 => {
                let total = old.samples + count;
                AlgoSpeeds {
                    comp_mb_s: (old.comp_mb_s * old.samples as f64 + new_comp_avg * count as f64)
                        / total as f64,
                    decomp_mb_s: (old.decomp_mb_s * old.samples as f64
                        + new_decomp_avg * count as f64)
                        / total as f64,
                    samples: total,
                }
            }
            _ => AlgoSpeeds { comp_mb_s: new_comp_avg, decomp_mb_s: new_decomp_avg, samples: count },
        };
        existing.insert(algo.to_string(), updated);
    }

    save_raw(&existing)
}
