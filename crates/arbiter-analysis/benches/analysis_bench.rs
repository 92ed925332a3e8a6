//! Lexical analyzer benchmarks.
//!
//! Run with: cargo bench -p arbiter-analysis --bench analysis_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use arbiter_analysis::dimensions::{analyze_lexical, LEXICAL_DIMENSIONS};
use arbiter_core::models::SourceResponse;

const PROCEDURE: &[&str] = &[
    "Lock out the breaker and verify the feeder is de-energized.",
    "Wear insulated gloves and a face shield.",
    "Disconnect the ground cable from the main bus bar.",
    "Remove the old contactor from the mounting rail.",
    "Install the new contactor onto the mounting rail.",
    "Torque the terminal lugs to 35 ft-lb.",
    "Connect the ground cable to the main bus bar.",
    "Set the supply to 480 V and verify rotation is clockwise.",
];

/// `count` sources, each a rotation of the procedure with one value changed.
fn make_sources(count: usize) -> Vec<SourceResponse> {
    (0..count)
        .map(|i| {
            let mut lines: Vec<String> = PROCEDURE.iter().map(|s| s.to_string()).collect();
            lines.rotate_left(i % PROCEDURE.len());
            lines.push(format!("Wait {} min before restoring power.", 5 + i));
            SourceResponse::free_text(format!("s{i}"), lines.join(" "), 0.9)
        })
        .collect()
}

fn lexical_dimensions(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexical_dimensions");

    for count in [2, 5, 10] {
        let sources = make_sources(count);
        for dimension in LEXICAL_DIMENSIONS {
            group.bench_with_input(
                BenchmarkId::new(dimension.name(), count),
                &sources,
                |b, sources| b.iter(|| analyze_lexical(dimension, black_box(sources))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, lexical_dimensions);
criterion_main!(benches);
