//! Benchmarks for the per-keystroke hot path.
//!
//! Run with: cargo bench

use cardflow::{format, luhn, BrandTable, Cardflow, Config};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const VISA_16: &str = "4242424242424242";
const AMEX_15: &str = "378282246310005";

fn bench_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum");

    group.bench_function("visa_16", |b| b.iter(|| luhn::is_valid(black_box(VISA_16))));
    group.bench_function("amex_15", |b| b.iter(|| luhn::is_valid(black_box(AMEX_15))));

    group.finish();
}

fn bench_detection(c: &mut Criterion) {
    let table = BrandTable::builtin();
    let mut group = c.benchmark_group("detection");

    group.bench_function("short_prefix", |b| b.iter(|| table.detect(black_box("4"))));
    group.bench_function("full_number", |b| b.iter(|| table.detect(black_box(VISA_16))));
    group.bench_function("no_match", |b| b.iter(|| table.detect(black_box("1234567890123456"))));

    group.finish();
}

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");

    group.bench_function("format_16", |b| {
        b.iter(|| format::format(black_box(VISA_16), 4, 2))
    });
    group.bench_function("format_with_cursor", |b| {
        b.iter(|| format::format_with_cursor(black_box(VISA_16), 16, 4, 2))
    });
    group.bench_function("placeholder_overlay", |b| {
        b.iter(|| format::placeholder_overlay(16, 4, 2, black_box(7)))
    });

    group.finish();
}

fn bench_keystroke_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("keystroke_cycle");

    group.bench_function("partial_number", |b| {
        let mut form = Cardflow::new(Config::default());
        b.iter(|| form.number_input(black_box("4242  4242  42"), 14))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_checksum,
    bench_detection,
    bench_formatting,
    bench_keystroke_cycle
);
criterion_main!(benches);
