//! Benchmarks for timeline construction.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pixelroll::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

use crate::{catalog, tracks, NOTE_COUNTS};

pub fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build/timeline");
    let catalog = catalog();

    for &count in NOTE_COUNTS {
        let tracks = tracks(count);

        for mode in [RandomMode::None, RandomMode::PerTrackLarge, RandomMode::PerNoteLarge] {
            let builder = TimelineBuilder::default().random(mode);
            let mut rng = SmallRng::seed_from_u64(7);
            let id = format!("{mode}");
            group.bench_with_input(BenchmarkId::new(id, count), &count, |b, _| {
                b.iter(|| builder.build(black_box(&tracks), &catalog, &mut rng))
            });
        }
    }

    group.finish();
}
