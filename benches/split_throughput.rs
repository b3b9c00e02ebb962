use chromsplit::{default_chromosomes, process_file, CancelToken, SplitConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs::File;
use std::hint::black_box;
use std::io::{BufWriter, Write};
use tempfile::TempDir;

/// Create a JSONL file with `records` variant-like records spread over all chromosomes
fn create_test_input(dir: &TempDir, records: usize) -> (std::path::PathBuf, u64) {
    let path = dir.path().join("input.jsonl");
    let mut writer = BufWriter::new(File::create(&path).unwrap());
    let chroms = default_chromosomes();

    for i in 0..records {
        // Every 50th record has a chromosome outside the default set
        let chr = if i % 50 == 0 {
            "chrUn_gl000220".to_string()
        } else {
            chroms[i % chroms.len()].clone()
        };
        writeln!(
            writer,
            "{{\"chr\":\"{}\",\"pos\":{},\"ref\":\"A\",\"alt\":\"G\",\"qual\":{:.1},\"info\":{{\"dp\":{},\"af\":0.5}}}}",
            chr,
            i * 17,
            (i % 100) as f64 / 2.0,
            i % 300
        )
        .unwrap();
    }
    writer.flush().unwrap();

    let size = std::fs::metadata(&path).unwrap().len();
    (path, size)
}

/// Benchmark split throughput for different write buffer sizes
fn bench_buffer_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_buffer_size");
    group.sample_size(10);

    let temp = TempDir::new().unwrap();
    let (input, size) = create_test_input(&temp, 200_000);
    group.throughput(Throughput::Bytes(size));

    for buffer_kb in [4usize, 64, 1024].iter() {
        group.bench_with_input(
            BenchmarkId::new("buffer_kb", buffer_kb),
            buffer_kb,
            |b, &buffer_kb| {
                b.iter(|| {
                    let config = SplitConfig {
                        input: input.clone(),
                        prefix: temp.path().join("out").to_string_lossy().into_owned(),
                        buffer_size: buffer_kb * 1024,
                        show_progress: false,
                        progress_interval: 0,
                        ..Default::default()
                    };
                    let stats = process_file(&config, &CancelToken::new()).unwrap();
                    black_box(stats);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark top-level vs nested routing keys
fn bench_field_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_field_depth");
    group.sample_size(10);

    let temp = TempDir::new().unwrap();
    let (input, size) = create_test_input(&temp, 100_000);
    group.throughput(Throughput::Bytes(size));

    for field in ["chr", "info.dp"].iter() {
        group.bench_with_input(BenchmarkId::new("field", field), field, |b, field| {
            b.iter(|| {
                let config = SplitConfig {
                    input: input.clone(),
                    prefix: temp.path().join("depth").to_string_lossy().into_owned(),
                    field: field.to_string(),
                    show_progress: false,
                    progress_interval: 0,
                    ..Default::default()
                };
                let stats = process_file(&config, &CancelToken::new()).unwrap();
                black_box(stats);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_buffer_sizes, bench_field_depth);
criterion_main!(benches);
