//! Benchmarks for timeline construction and per-frame drawing.
//!
//! Run with: cargo bench
//!
//! A frame has to be drawn well inside one display refresh:
//!   - 60 Hz  = 16.7ms
//!   - 120 Hz = 8.3ms
//!
//! Benchmark groups:
//!   - build/*   Timeline construction per randomization mode
//!   - render/*  Frame drawing at several note counts and surface sizes

use criterion::{criterion_group, criterion_main};
use pixelroll::prelude::*;

mod build;
mod render;

/// Note counts used across groups.
pub const NOTE_COUNTS: &[usize] = &[100, 1_000, 10_000];

/// Standard catalog over a solid atlas.
pub fn catalog() -> GlyphCatalog {
    let (w, h) = GlyphRegistry::standard().required_atlas_size();
    let mut atlas = Raster::new(w, h);
    atlas.fill_rect(atlas.bounds(), Color::rgb(220, 120, 60));
    match GlyphCatalog::new(&Atlas::new(atlas)) {
        Ok(catalog) => catalog,
        Err(err) => panic!("bench atlas: {err}"),
    }
}

/// `count` notes spread over four tracks, mixing short and long notes.
pub fn tracks(count: usize) -> Vec<NoteTrack> {
    let mut tracks: Vec<NoteTrack> = (0..4)
        .map(|i| NoteTrack::new(format!("track {i}"), Vec::new()))
        .collect();
    for i in 0..count {
        let pitch = 36 + (i * 7 % 48) as u8;
        let onset = i as f64 * 0.05;
        let duration = [0.08, 0.15, 0.4, 1.2][i % 4];
        tracks[i % 4].notes.push(NoteEvent::new(pitch, onset, duration));
    }
    tracks
}

criterion_group!(
    benches,
    build::bench_build,
    render::bench_render,
);
criterion_main!(benches);
