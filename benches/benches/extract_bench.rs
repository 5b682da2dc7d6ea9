//! Бенчмарки поиска маркеров, сборки спектров и голосования фона.
//!
//! Запуск: cargo bench -p srs-benchmark

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use srs_core::{
    background::{locate_by_votes, VotingConfig},
    pipeline::{ExtractionConfig, Extractor},
    scan::find_all,
    synth::{spectrum, SrsBuilder},
};
use srs_types::{DEFAULT_MAX_HITS, FRAME_MARKER};

/// ~8 МБ: 2000 кадров Rapid Scan по 1024 точки и четыре фоновых блока.
fn synthetic_file() -> Vec<u8> {
    let mut b = SrsBuilder::new();

    for i in 0..2_000 {
        b.frame(&format!("{:.3}", i as f64 * 0.05), 80, &spectrum(1_024, i as f32 * 0.01));
    }
    b.marker("100.0");

    for k in 0..4 {
        b.zeros(12_000);
        b.background(&spectrum(1_024, 50.0 + k as f32));
    }
    b.zeros(4_096);

    b.build()
}

fn bench_find_all(c: &mut Criterion) {
    let buf = synthetic_file();

    let mut group = c.benchmark_group("find_all");
    group.throughput(Throughput::Bytes(buf.len() as u64));

    group.bench_function("frame_marker", |bencher| {
        bencher.iter(|| find_all(black_box(&buf), black_box(&FRAME_MARKER), DEFAULT_MAX_HITS))
    });

    group.finish();
}

fn bench_spectra(c: &mut Criterion) {
    let buf = synthetic_file();

    let mut group = c.benchmark_group("spectra");
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.sample_size(20);

    group.bench_function("extract_spectra_fast", |bencher| {
        bencher.iter(|| {
            Extractor::new(black_box(&buf), ExtractionConfig::fast())
                .extract_spectra()
                .map(|s| s.spectra.rows())
        })
    });

    group.finish();
}

fn bench_voting(c: &mut Criterion) {
    let buf = synthetic_file();
    let cfg = VotingConfig::default();

    let mut group = c.benchmark_group("background");
    group.throughput(Throughput::Bytes(buf.len() as u64));

    group.bench_function("locate_by_votes", |bencher| {
        bencher.iter(|| locate_by_votes(black_box(&buf), &cfg))
    });

    group.finish();
}

criterion_group!(benches, bench_find_all, bench_spectra, bench_voting);
criterion_main!(benches);
