//! Timeline builder - turns note tracks into a sorted draw list

use rand::Rng;

use super::random::{randomized_speed, RandomMode, RandomScope};
use super::{NoteTrack, PitchRange, RenderNote, Timeline};
use crate::glyph::GlyphCatalog;

/// Default horizontal speed in pixels per second
pub const DEFAULT_SPEED: f64 = 150.0;
/// Default lead-in so the first note starts right of the playhead
pub const DEFAULT_TIME_OFFSET: f64 = 1.0;

/// Parameters a timeline is built for
///
/// Changing any of these means building a new timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimelineConfig {
    /// Baseline speed in pixels per second (must be positive)
    pub speed: f64,
    pub random: RandomMode,
    /// Seconds added to every onset
    pub time_offset: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            random: RandomMode::None,
            time_offset: DEFAULT_TIME_OFFSET,
        }
    }
}

/// Builds [`Timeline`]s for one configuration
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    config: TimelineConfig,
}

impl TimelineBuilder {
    pub fn new(config: TimelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Set the baseline speed
    pub fn speed(mut self, speed: f64) -> Self {
        self.config.speed = speed;
        self
    }

    /// Set the randomization mode
    pub fn random(mut self, random: RandomMode) -> Self {
        self.config.random = random;
        self
    }

    /// Set the lead-in offset
    pub fn time_offset(mut self, time_offset: f64) -> Self {
        self.config.time_offset = time_offset;
        self
    }

    /// Build a timeline from `tracks`
    ///
    /// Empty tracks and notes with a non-positive duration are skipped.
    /// Glyphs are chosen from `catalog` once per note, here, so the draw
    /// loop never makes random choices.
    pub fn build<R: Rng + ?Sized>(
        &self,
        tracks: &[NoteTrack],
        catalog: &GlyphCatalog,
        rng: &mut R,
    ) -> Timeline {
        let TimelineConfig {
            speed: baseline,
            random,
            time_offset,
        } = self.config;

        let mut notes = Vec::new();
        let mut low: Option<u8> = None;
        let mut high: Option<u8> = None;

        for (track_idx, track) in tracks.iter().enumerate() {
            if track.notes.is_empty() {
                continue;
            }

            let track_speed = match random.fraction_for(RandomScope::PerTrack) {
                Some(fraction) => randomized_speed(baseline, fraction, rng),
                None => baseline,
            };

            for event in track.notes.iter().filter(|e| e.is_renderable()) {
                let speed = match random.fraction_for(RandomScope::PerNote) {
                    Some(fraction) => randomized_speed(baseline, fraction, rng),
                    None => track_speed,
                };

                low = Some(low.map_or(event.pitch, |p| p.min(event.pitch)));
                high = Some(high.map_or(event.pitch, |p| p.max(event.pitch)));

                let width = event.duration_sec * speed;
                let glyph = catalog.select(width, rng);
                notes.push(RenderNote::new(
                    event.pitch,
                    event.onset_sec + time_offset,
                    event.duration_sec,
                    speed,
                    glyph,
                    track_idx,
                ));
            }
        }

        // Stable: equal pitches keep track/insertion order
        notes.sort_by(|a, b| b.pitch().cmp(&a.pitch()));

        let pitch_range = PitchRange {
            low: low.unwrap_or(PitchRange::EMPTY.low),
            high: high.unwrap_or(PitchRange::EMPTY.high),
        };

        log::debug!(
            "built timeline: {} notes from {} tracks, pitch {}..={}, speed {} ({})",
            notes.len(),
            tracks.len(),
            pitch_range.low,
            pitch_range.high,
            baseline,
            random
        );

        Timeline::new(notes, pitch_range)
    }
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Atlas;
    use crate::glyph::GlyphRegistry;
    use crate::raster::{Color, Raster, Surface};
    use crate::timeline::NoteEvent;
    use rand::{rngs::SmallRng, SeedableRng};

    fn catalog() -> GlyphCatalog {
        let (w, h) = GlyphRegistry::standard().required_atlas_size();
        let mut r = Raster::new(w, h);
        r.fill_rect(r.bounds(), Color::WHITE);
        GlyphCatalog::new(&Atlas::new(r)).unwrap()
    }

    #[test]
    fn test_single_note_scenario() {
        let tracks = vec![NoteTrack::new("lead", vec![NoteEvent::new(60, 0.0, 0.5)])];
        let timeline = TimelineBuilder::default().build(
            &tracks,
            &catalog(),
            &mut SmallRng::seed_from_u64(1),
        );

        assert_eq!(timeline.len(), 1);
        let note = timeline.notes()[0];
        assert_eq!(note.onset_sec(), 1.0);
        assert_eq!(note.speed(), 150.0);
        assert_eq!(note.width(), 75.0);
        assert_eq!(timeline.pitch_range(), PitchRange { low: 60, high: 60 });
    }

    #[test]
    fn test_sorted_by_pitch_descending_stable() {
        let tracks = vec![
            NoteTrack::new(
                "a",
                vec![
                    NoteEvent::new(60, 0.0, 0.1),
                    NoteEvent::new(72, 0.5, 0.1),
                    NoteEvent::new(60, 1.0, 0.1),
                ],
            ),
            NoteTrack::new("b", vec![NoteEvent::new(60, 0.25, 0.1)]),
        ];
        let timeline = TimelineBuilder::default().build(
            &tracks,
            &catalog(),
            &mut SmallRng::seed_from_u64(1),
        );

        let order: Vec<(u8, f64, usize)> = timeline
            .notes()
            .iter()
            .map(|n| (n.pitch(), n.onset_sec(), n.track()))
            .collect();
        assert_eq!(
            order,
            vec![(72, 1.5, 0), (60, 1.0, 0), (60, 2.0, 0), (60, 1.25, 1)]
        );
    }

    #[test]
    fn test_skips_empty_tracks_and_silent_notes() {
        let tracks = vec![
            NoteTrack::default(),
            NoteTrack::new(
                "x",
                vec![NoteEvent::new(10, 0.0, 0.0), NoteEvent::new(100, 0.0, -0.5)],
            ),
        ];
        let timeline = TimelineBuilder::default().build(
            &tracks,
            &catalog(),
            &mut SmallRng::seed_from_u64(1),
        );
        assert!(timeline.is_empty());
        assert_eq!(timeline.pitch_range(), PitchRange::EMPTY);
        assert_eq!(timeline.pitch_range().span(), 1);
    }

    #[test]
    fn test_per_track_mode_shares_speed_within_track() {
        let notes: Vec<NoteEvent> = (0..20).map(|i| NoteEvent::new(60, i as f64, 0.2)).collect();
        let tracks = vec![NoteTrack::new("a", notes.clone()), NoteTrack::new("b", notes)];
        let timeline = TimelineBuilder::default()
            .random(RandomMode::PerTrackLarge)
            .build(&tracks, &catalog(), &mut SmallRng::seed_from_u64(9));

        for track in 0..2 {
            let speeds: Vec<f64> = timeline
                .notes()
                .iter()
                .filter(|n| n.track() == track)
                .map(|n| n.speed())
                .collect();
            assert_eq!(speeds.len(), 20);
            assert!(speeds.iter().all(|&s| s == speeds[0]));
            assert!(speeds[0] >= 90.0 && speeds[0] <= 210.0);
        }
    }

    #[test]
    fn test_per_note_mode_draws_each_note() {
        let notes: Vec<NoteEvent> = (0..50).map(|i| NoteEvent::new(60, i as f64, 0.2)).collect();
        let timeline = TimelineBuilder::default()
            .random(RandomMode::PerNoteSmall)
            .build(&[NoteTrack::new("a", notes)], &catalog(), &mut SmallRng::seed_from_u64(4));

        let first = timeline.notes()[0].speed();
        assert!(timeline.notes().iter().any(|n| n.speed() != first));
        for n in timeline.notes() {
            assert!(n.speed() >= 135.0 && n.speed() <= 165.0);
            assert!((n.width() - n.duration_sec() * n.speed()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_builder_setters() {
        let builder = TimelineBuilder::default()
            .speed(180.0)
            .random(RandomMode::PerNoteMedium)
            .time_offset(0.0);
        assert_eq!(
            *builder.config(),
            TimelineConfig {
                speed: 180.0,
                random: RandomMode::PerNoteMedium,
                time_offset: 0.0,
            }
        );
    }
}
