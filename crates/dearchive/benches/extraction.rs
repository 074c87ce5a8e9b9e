//! Benchmarks for dearchive extraction.
//!
//! Measures the per-entry pipeline cost (sanitize, strip, filter, write)
//! separately from container decoding.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use dearchive::ExtractOptions;
use dearchive::Extractor;
use dearchive::formats::MemorySource;
use dearchive::formats::TarSource;
use dearchive::formats::ZipSource;
use dearchive::test_utils::TarTestBuilder;
use dearchive::test_utils::ZipTestBuilder;
use dearchive::types::SafePath;
use std::hint::black_box;
use std::io::Cursor;
use tempfile::TempDir;

/// Builds a source with `count` small files spread over a few directories.
fn many_small_files(count: usize) -> MemorySource {
    (0..count)
        .map(|i| {
            let name = format!("top/dir{}/file{i:04}.txt", i % 8);
            (dearchive::Entry::file(name, None), format!("content{i}").into_bytes())
        })
        .collect()
}

fn many_small_files_tar(count: usize) -> Vec<u8> {
    (0..count)
        .fold(TarTestBuilder::new(), |builder, i| {
            builder.add_file(&format!("top/dir{}/file{i:04}.txt", i % 8), b"content")
        })
        .build()
}

fn many_small_files_zip(count: usize) -> Vec<u8> {
    (0..count)
        .fold(ZipTestBuilder::new(), |builder, i| {
            builder.add_file(&format!("top/dir{}/file{i:04}.txt", i % 8), b"content")
        })
        .build()
}

fn bench_sanitize(c: &mut Criterion) {
    let names = [
        "file.txt",
        "a/b/c/d/e/f/g/file.txt",
        "./dir//nested\\windows\\style.txt",
        "dir/../escape.txt",
    ];

    let mut group = c.benchmark_group("sanitize");
    for name in names {
        group.bench_with_input(BenchmarkId::from_parameter(name), name, |b, name| {
            b.iter(|| SafePath::sanitize(black_box(name)));
        });
    }
    group.finish();
}

fn bench_memory_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_memory");
    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        for strip in [0, 1] {
            group.bench_with_input(
                BenchmarkId::new(format!("strip{strip}"), count),
                &count,
                |b, &count| {
                    b.iter_batched(
                        || (many_small_files(count), TempDir::new().unwrap()),
                        |(mut source, temp)| {
                            let options = ExtractOptions::default().with_strip_components(strip);
                            let report = Extractor::new(options)
                                .extract(&mut source, temp.path())
                                .unwrap();
                            black_box(report);
                        },
                        criterion::BatchSize::LargeInput,
                    );
                },
            );
        }
    }
    group.finish();
}

fn bench_formats(c: &mut Criterion) {
    let count = 500;
    let tar_data = many_small_files_tar(count);
    let zip_data = many_small_files_zip(count);

    let mut group = c.benchmark_group("extract_format");
    group.throughput(Throughput::Elements(count as u64));

    group.bench_function("tar", |b| {
        b.iter_batched(
            || TempDir::new().unwrap(),
            |temp| {
                let mut archive = tar::Archive::new(Cursor::new(tar_data.as_slice()));
                let mut source = TarSource::new(&mut archive).unwrap();
                black_box(Extractor::default().extract(&mut source, temp.path()).unwrap());
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function("zip", |b| {
        b.iter_batched(
            || TempDir::new().unwrap(),
            |temp| {
                let mut source = ZipSource::new(Cursor::new(zip_data.as_slice())).unwrap();
                black_box(Extractor::default().extract(&mut source, temp.path()).unwrap());
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn bench_large_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_large_file");
    for size_mb in [1, 10] {
        let size = size_mb * 1024 * 1024;
        group.throughput(Throughput::Bytes(size as u64));
        let id = BenchmarkId::from_parameter(format!("{size_mb}MB"));
        group.bench_with_input(id, &size, |b, &size| {
            b.iter_batched(
                || {
                    let source = MemorySource::new().with_file("large.bin", vec![0xAB; size]);
                    (source, TempDir::new().unwrap())
                },
                |(mut source, temp)| {
                    black_box(Extractor::default().extract(&mut source, temp.path()).unwrap());
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_sanitize,
    bench_memory_source,
    bench_formats,
    bench_large_file
);
criterion_main!(benches);
