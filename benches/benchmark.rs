use compresso::level::Level;
use compresso::registry;
use criterion::*;

/// A few KiB of semi-compressible text, repeated to a benchmark-sized input.
/// Deterministic so runs are comparable across machines.
fn sample_input(len: usize) -> Vec<u8> {
    const LINE: &[u8] = b"the quick brown fox jumps over the lazy dog 0123456789\n";
    LINE.iter().copied().cycle().take(len).collect()
}

fn bench_backend_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("backend/round_trip");
    group.sample_size(20);

    let input = sample_input(256 * 1024);

    for cap in registry::list() {
        let backend = registry::by_name(cap.name).unwrap();

        group.bench_with_input(BenchmarkId::new("compress", cap.name), &input, |b, input| {
            b.iter(|| backend.compress(black_box(input), Level::Unspecified).unwrap())
        });

        let compressed = backend.compress(&input, Level::Unspecified).unwrap();
        group.bench_with_input(
            BenchmarkId::new("decompress", cap.name),
            &compressed,
            |b, compressed| {
                b.iter(|| {
                    let mut out = Vec::new();
                    backend.decompress(black_box(compressed), &mut out).unwrap();
                    out
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_backend_round_trip);
criterion_main!(benches);
