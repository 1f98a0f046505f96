//! Benchmarks for offset translation and position lookup.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stylelens::domain::document::Document;
use stylelens::domain::offsets::{Granularity, OffsetTranslator};

// ═══════════════════════════════════════════════════════════════════════════
// Synthetic Data Generators
// ═══════════════════════════════════════════════════════════════════════════

/// A style module with `rules` entries; every fourth line carries non-ASCII
/// text so both fast and slow paths are hit.
fn synthetic_source(rules: usize) -> String {
    let mut source = String::from("import * as stylex from '@stylexjs/stylex';\n\nconst styles = stylex.create({\n");
    for i in 0..rules {
        if i % 4 == 0 {
            source.push_str(&format!("  // 🎨 règle {}\n", i));
        }
        source.push_str(&format!("  rule{}: {{ color: '#{:06x}', marginTop: {} }},\n", i, i * 4099 % 0xffffff, i % 64));
    }
    source.push_str("});\n");
    source
}

// ═══════════════════════════════════════════════════════════════════════════
// Translator Benchmarks
// ═══════════════════════════════════════════════════════════════════════════

fn bench_translator_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("offsets/build");

    for rules in [100, 1_000, 10_000].iter() {
        let source = synthetic_source(*rules);
        group.throughput(Throughput::Bytes(source.len() as u64));

        for granularity in [Granularity::CodeUnit, Granularity::Grapheme] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", granularity), rules),
                &source,
                |b, source| b.iter(|| OffsetTranslator::new(black_box(source.as_str()), granularity)),
            );
        }
    }

    group.finish();
}

fn bench_byte_to_char(c: &mut Criterion) {
    let mut group = c.benchmark_group("offsets/byte_to_char");

    for rules in [100, 1_000, 10_000].iter() {
        let source = synthetic_source(*rules);
        let translator = OffsetTranslator::new(source.as_str(), Granularity::CodeUnit);
        let probes: Vec<usize> = (0..256).map(|i| i * source.len() / 256).collect();
        group.throughput(Throughput::Elements(probes.len() as u64));

        group.bench_with_input(BenchmarkId::new("rules", rules), &probes, |b, probes| {
            b.iter(|| {
                probes
                    .iter()
                    .map(|&offset| translator.byte_offset_to_char_index(black_box(offset)))
                    .sum::<usize>()
            })
        });
    }

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Document Position Benchmarks
// ═══════════════════════════════════════════════════════════════════════════

fn bench_position_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("offsets/position_round_trip");
    group.sample_size(30);

    let source = synthetic_source(5_000);
    let document = Document::new("file:///bench.ts", "typescript", 1, source.as_str());
    let probes: Vec<usize> = source.match_indices("color").map(|(i, _)| i).collect();
    group.throughput(Throughput::Elements(probes.len() as u64));

    group.bench_function("color_keys", |b| {
        b.iter(|| {
            for &byte in &probes {
                let position = document.position_of_byte(black_box(byte));
                black_box(document.byte_of_position(position));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_translator_build, bench_byte_to_char, bench_position_round_trip);
criterion_main!(benches);
