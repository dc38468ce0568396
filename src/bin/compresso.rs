use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use compresso::level::{Level, Strategy};
use compresso::speed_cache::{self, Sample};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file into a compresso container
    Compress {
        src: PathBuf,
        dest: PathBuf,
        #[arg(short, long)]
        algo: Option<String>,
        #[arg(short, long, default_value = "balanced")]
        strategy: String,
        #[arg(short, long)]
        level: Option<u8>,
    },
    /// Decompress a compresso container
    Decompress {
        src: PathBuf,
        dest: PathBuf,
        #[arg(short, long)]
        algo: Option<String>,
    },
    /// Print the parsed container header without decompressing
    Inspect { path: PathBuf },
    /// List compiled-in compression backends
    Backends,
    /// Benchmark compiled-in backends against a sample file
    Bench {
        file: PathBuf,
        #[arg(long, value_delimiter = ',')]
        algos: Option<Vec<String>>,
        #[arg(long, value_delimiter = ',', default_value = "balanced")]
        strategies: Vec<String>,
        #[arg(long)]
        level: Option<u8>,
        #[arg(long, default_value_t = 3)]
        repeats: u32,
        #[arg(long)]
        temp_dir: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        update_cache: bool,
    },
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    match s {
        "fast" => Ok(Strategy::Fast),
        "balanced" => Ok(Strategy::Balanced),
        "max_ratio" => Ok(Strategy::MaxRatio),
        other => Err(format!("unknown strategy: {other}")),
    }
}

fn parse_level(level: Option<u8>) -> Result<Level, compresso::CompressoError> {
    match level {
        None => Ok(Level::Unspecified),
        Some(v) => Level::from_value(v),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let result = match args.cmd {
        Command::Compress { src, dest, algo, strategy, level } => {
            run_compress(&src, &dest, algo, &strategy, level)
        }
        Command::Decompress { src, dest, algo } => run_decompress(&src, &dest, algo),
        Command::Inspect { path } => {
            run_inspect(&path);
            Ok(())
        }
        Command::Backends => {
            run_backends();
            Ok(())
        }
        Command::Bench { file, algos, strategies, level, repeats, temp_dir, update_cache } => {
            run_bench(&file, algos, &strategies, level, repeats, temp_dir, update_cache)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn run_compress(
    src: &std::path::Path,
    dest: &std::path::Path,
    algo: Option<String>,
    strategy: &str,
    level: Option<u8>,
) -> Result<(), String> {
    let strategy = parse_strategy(strategy)?;
    let level = parse_level(level).map_err(|e| e.to_string())?;

    let src_len = std::fs::metadata(src).map(|m| m.len()).unwrap_or(0);
    let bar = indicatif::ProgressBar::new(src_len);
    bar.set_style(
        indicatif::ProgressStyle::with_template("{bar:40} {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
    );

    let result = compresso::compress_file_with_progress(
        src,
        dest,
        algo.as_deref(),
        strategy,
        level,
        |done| bar.set_position(done),
    );
    bar.finish_and_clear();
    result.map_err(|e| e.to_string())
}

fn run_decompress(
    src: &std::path::Path,
    dest: &std::path::Path,
    algo: Option<String>,
) -> Result<(), String> {
    compresso::decompress_file(src, dest, algo.as_deref()).map_err(|e| e.to_string())
}

fn run_inspect(path: &std::path::Path) {
    let result = compresso::inspect(path);
    println!("path: {}", result.path.display());
    println!("is_compresso: {}", result.is_compresso);
    println!("header_ok: {}", result.header_ok);
    if let Some(reason) = &result.reason {
        println!("reason: {reason}");
    }
    if let Some(algo) = &result.algo_name {
        println!("algo: {algo}");
    } else if let Some(id) = result.algo_id {
        println!("algo_id: {id} (unrecognized)");
    }
    if let Some(level) = result.level {
        println!("level: {level}");
    } else if result.header_ok {
        println!("level: unspecified");
    }
    if let Some(size) = result.orig_size {
        println!("orig_size: {size}");
    }
    println!("backend_available: {}", result.backend_available);
    println!("can_decompress: {}", result.can_decompress);
    if let Some(secs) = result.estimated_decomp_s {
        println!("estimated_decomp_s: {secs:.3}");
    }
}

fn run_backends() {
    println!(
        "{:<8} {:>4} {:>10} {:>10} {:>10}",
        "name", "id", "has_buf", "has_stream", "available"
    );
    for cap in compresso::get_capabilities() {
        println!(
            "{:<8} {:>4} {:>10} {:>10} {:>10}",
            cap.name, cap.id, cap.has_buffer, cap.has_stream, cap.available
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn run_bench(
    file: &std::path::Path,
    algos: Option<Vec<String>>,
    strategies: &[String],
    level: Option<u8>,
    repeats: u32,
    temp_dir: Option<PathBuf>,
    update_cache: bool,
) -> Result<(), String> {
    let level = parse_level(level).map_err(|e| e.to_string())?;
    let temp_dir = temp_dir
        .or_else(|| std::env::var_os("TMPDIR").map(PathBuf::from))
        .unwrap_or_else(std::env::temp_dir);

    let names: Vec<String> = match algos {
        Some(a) => a,
        None => compresso::get_capabilities().into_iter().map(|c| c.name.to_string()).collect(),
    };
    // Strategy list is accepted for CLI compatibility but an explicit algo
    // list always takes precedence over heuristic selection during
    // benchmarking, matching `compress_file`'s own override rule.
    let _ = strategies;

    println!("{:<8} {:>12} {:>12}", "algo", "comp_mb_s", "decomp_mb_s");

    let mut samples = Vec::new();
    for name in &names {
        let compressed = temp_dir.join(format!("compresso-bench-{name}.cmp"));
        let roundtrip = temp_dir.join(format!("compresso-bench-{name}.out"));

        let mut comp_total = 0.0;
        let mut decomp_total = 0.0;
        let orig_len = std::fs::metadata(file).map_err(|e| e.to_string())?.len() as f64;

        for _ in 0..repeats.max(1) {
            let start = Instant::now();
            compresso::compress_file(file, &compressed, Some(name), Strategy::Balanced, level)
                .map_err(|e| e.to_string())?;
            let comp_elapsed = start.elapsed().as_secs_f64();

            let start = Instant::now();
            compresso::decompress_file(&compressed, &roundtrip, None).map_err(|e| e.to_string())?;
            let decomp_elapsed = start.elapsed().as_secs_f64();

            if comp_elapsed > 0.0 {
                comp_total += (orig_len / (1024.0 * 1024.0)) / comp_elapsed;
            }
            if decomp_elapsed > 0.0 {
                decomp_total += (orig_len / (1024.0 * 1024.0)) / decomp_elapsed;
            }
        }

        let runs = repeats.max(1) as f64;
        let comp_mb_s = comp_total / runs;
        let decomp_mb_s = decomp_total / runs;
        println!("{:<8} {:>12.1} {:>12.1}", name, comp_mb_s, decomp_mb_s);

        samples.push(Sample { algo: name.clone(), comp_mb_s, decomp_mb_s });

        let _ = std::fs::remove_file(&compressed);
        let _ = std::fs::remove_file(&roundtrip);
    }

    if update_cache {
        speed_cache::update_from_benchmarks(&samples).map_err(|e| e.to_string())?;
    }

    Ok(())
}
