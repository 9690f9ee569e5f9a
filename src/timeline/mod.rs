//! Note timeline: source note events and the derived, render-ready
//! timeline built from them.

pub mod builder;
pub mod random;

pub use builder::{TimelineBuilder, TimelineConfig};
pub use random::{RandomMode, RandomScope};

use crate::glyph::GlyphId;

/// A note from the note source
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// MIDI pitch (0-127)
    pub pitch: u8,
    /// Start time in seconds from the beginning of the song
    pub onset_sec: f64,
    /// Length in seconds; zero or negative notes are never drawn
    pub duration_sec: f64,
    /// MIDI-style velocity (0.0-1.0); carried through but not drawn
    #[cfg_attr(feature = "serde", serde(default = "full_velocity"))]
    pub velocity: f32,
}

#[cfg(feature = "serde")]
fn full_velocity() -> f32 {
    1.0
}

impl NoteEvent {
    pub fn new(pitch: u8, onset_sec: f64, duration_sec: f64) -> Self {
        Self {
            pitch,
            onset_sec,
            duration_sec,
            velocity: 1.0,
        }
    }

    pub fn is_renderable(&self) -> bool {
        self.duration_sec > 0.0
    }
}

/// One track of the note source, notes in source order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteTrack {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub notes: Vec<NoteEvent>,
}

impl NoteTrack {
    pub fn new(name: impl Into<String>, notes: Vec<NoteEvent>) -> Self {
        Self {
            name: name.into(),
            notes,
        }
    }
}

/// A note ready to draw: source data plus its speed, width and glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderNote {
    pitch: u8,
    onset_sec: f64,
    duration_sec: f64,
    speed: f64,
    width: f64,
    glyph: GlyphId,
    track: usize,
}

impl RenderNote {
    /// `onset_sec` already includes the lead-in offset
    pub(crate) fn new(
        pitch: u8,
        onset_sec: f64,
        duration_sec: f64,
        speed: f64,
        glyph: GlyphId,
        track: usize,
    ) -> Self {
        Self {
            pitch,
            onset_sec,
            duration_sec,
            speed,
            width: duration_sec * speed,
            glyph,
            track,
        }
    }

    pub fn pitch(&self) -> u8 {
        self.pitch
    }

    /// Timeline position in seconds (lead-in applied)
    pub fn onset_sec(&self) -> f64 {
        self.onset_sec
    }

    pub fn duration_sec(&self) -> f64 {
        self.duration_sec
    }

    /// Horizontal speed in pixels per second
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Requested width in pixels (`duration * speed`)
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn glyph(&self) -> GlyphId {
        self.glyph
    }

    /// Index of the source track
    pub fn track(&self) -> usize {
        self.track
    }

    /// Screen x of the note's left edge at `elapsed` seconds
    pub fn screen_x(&self, elapsed: f64, playhead: f64) -> i32 {
        ((self.onset_sec - elapsed) * self.speed + playhead).round() as i32
    }
}

/// Observed pitch bounds of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitchRange {
    pub low: u8,
    pub high: u8,
}

impl PitchRange {
    /// Bounds reported when no note survives
    pub const EMPTY: PitchRange = PitchRange { low: 127, high: 0 };

    /// `high - low`, never less than one
    pub fn span(&self) -> i32 {
        (self.high as i32 - self.low as i32).max(1)
    }

    /// 0.0 at the top pitch, 1.0 at the bottom one
    pub fn normalized_from_top(&self, pitch: u8) -> f64 {
        1.0 - (pitch as i32 - self.low as i32) as f64 / self.span() as f64
    }
}

/// Immutable draw list: notes sorted by pitch, highest first
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    notes: Vec<RenderNote>,
    pitch_range: PitchRange,
}

impl Timeline {
    /// A timeline with nothing to draw
    pub const EMPTY: Timeline = Timeline {
        notes: Vec::new(),
        pitch_range: PitchRange::EMPTY,
    };

    pub(crate) fn new(notes: Vec<RenderNote>, pitch_range: PitchRange) -> Self {
        Self { notes, pitch_range }
    }

    /// Notes in draw order
    pub fn notes(&self) -> &[RenderNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn pitch_range(&self) -> PitchRange {
        self.pitch_range
    }

    /// End of the last note, in timeline seconds
    pub fn duration_sec(&self) -> f64 {
        self.notes
            .iter()
            .map(|n| n.onset_sec + n.duration_sec)
            .fold(0.0, f64::max)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_has_unit_span() {
        assert_eq!(PitchRange::EMPTY.span(), 1);
        assert_eq!(PitchRange { low: 60, high: 60 }.span(), 1);
        assert_eq!(PitchRange { low: 48, high: 72 }.span(), 24);
    }

    #[test]
    fn normalized_pitch_runs_top_down() {
        let range = PitchRange { low: 48, high: 72 };
        assert_eq!(range.normalized_from_top(72), 0.0);
        assert_eq!(range.normalized_from_top(48), 1.0);
        assert_eq!(range.normalized_from_top(60), 0.5);
    }

    #[test]
    fn render_note_width_and_position() {
        let note = RenderNote::new(60, 1.0, 0.5, 150.0, GlyphId(0), 0);
        assert_eq!(note.width(), 75.0);
        assert_eq!(note.screen_x(0.0, 40.0), 190);
        assert_eq!(note.screen_x(1.0, 40.0), 40);
    }

    #[test]
    fn duration_is_latest_note_end() {
        assert_eq!(Timeline::EMPTY.duration_sec(), 0.0);
        let timeline = Timeline::new(
            vec![
                RenderNote::new(72, 1.0, 3.0, 150.0, GlyphId(0), 0),
                RenderNote::new(60, 2.5, 0.5, 150.0, GlyphId(0), 0),
            ],
            PitchRange { low: 60, high: 72 },
        );
        assert_eq!(timeline.duration_sec(), 4.0);
    }

    #[test]
    fn renderable_requires_positive_duration() {
        assert!(NoteEvent::new(60, 0.0, 0.1).is_renderable());
        assert!(!NoteEvent::new(60, 0.0, 0.0).is_renderable());
        assert!(!NoteEvent::new(60, 0.0, -1.0).is_renderable());
    }
}
