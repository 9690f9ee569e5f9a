//! Benchmarks for frame drawing.

use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion};
use pixelroll::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

use crate::{catalog, tracks, NOTE_COUNTS};

/// Surface sizes: terminal-ish, 720p at scale 2, 1080p at scale 3
const VIEWPORTS: &[(u32, u32)] = &[(160, 96), (1280, 720), (1920, 1080)];

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/frame");

    for &(width, height) in VIEWPORTS {
        for &count in NOTE_COUNTS {
            let clock = Rc::new(ManualClock::default());
            let mut roll = TimelineRenderer::new(
                catalog(),
                Raster::new(1, 1),
                clock.clone(),
                FrameQueue::new(),
                RendererConfig::default(),
            );
            roll.update_surface_size(width, height);
            roll.rebuild(
                &TimelineBuilder::default(),
                &tracks(count),
                &mut SmallRng::seed_from_u64(3),
            );
            roll.start(0.0);
            // Somewhere in the middle of the song
            clock.set(count as f64 * 0.025);

            let id = BenchmarkId::new(format!("{width}x{height}"), count);
            group.bench_with_input(id, &count, |b, _| {
                b.iter(|| {
                    roll.render();
                    black_box(roll.surface());
                })
            });
        }
    }

    group.finish();
}
