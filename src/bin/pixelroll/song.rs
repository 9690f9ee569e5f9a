//! Note sources: JSON files and the built-in demo arrangement
//!
//! A notes file is a JSON array of tracks:
//!
//! ```json
//! [{ "name": "lead", "notes": [{ "pitch": 60, "onset_sec": 0.0, "duration_sec": 0.5 }] }]
//! ```

use std::path::Path;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use pixelroll::timeline::{NoteEvent, NoteTrack};

pub fn load(path: &Path) -> EyreResult<Vec<NoteTrack>> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("cannot read notes file {}", path.display()))?;
    let tracks: Vec<NoteTrack> = serde_json::from_str(&text)
        .wrap_err_with(|| format!("invalid notes file {}", path.display()))?;
    log::info!(
        "loaded {} tracks ({} notes) from {}",
        tracks.len(),
        tracks.iter().map(|t| t.notes.len()).sum::<usize>(),
        path.display()
    );
    Ok(tracks)
}

const BEAT: f64 = 0.5; // 120 BPM
const BAR: f64 = BEAT * 4.0;
const BARS: usize = 16;

/// Lead, bass and pad over a four-bar progression
pub fn demo() -> Vec<NoteTrack> {
    // Root of each bar: Am F C G
    let roots = [57u8, 53, 48, 55];
    // (beat offset, length in beats, scale step)
    let phrase: [(f64, f64, usize); 8] = [
        (0.0, 0.5, 0),
        (0.5, 0.5, 2),
        (1.0, 1.0, 4),
        (2.0, 0.25, 3),
        (2.25, 0.25, 2),
        (2.5, 0.5, 1),
        (3.0, 0.5, 2),
        (3.5, 0.5, 4),
    ];
    let scale = [0u8, 2, 3, 5, 7, 8, 10];

    let mut lead = Vec::new();
    let mut bass = Vec::new();
    let mut pad = Vec::new();

    for bar in 0..BARS {
        let start = bar as f64 * BAR;
        let root = roots[bar % roots.len()];

        for &(offset, length, step) in &phrase {
            let lift = if bar % 2 == 1 { scale[(step + 2) % scale.len()] } else { scale[step] };
            lead.push(NoteEvent::new(root + 12 + lift, start + offset * BEAT, length * BEAT * 0.9));
        }

        bass.push(NoteEvent::new(root - 12, start, BEAT * 1.8));
        bass.push(NoteEvent::new(root - 12, start + 2.0 * BEAT, BEAT * 0.4));
        bass.push(NoteEvent::new(root - 5, start + 3.0 * BEAT, BEAT * 0.9));

        for interval in [0u8, 7] {
            pad.push(NoteEvent::new(root + interval, start, BAR * 0.95));
        }
    }

    vec![
        NoteTrack::new("lead", lead),
        NoteTrack::new("bass", bass),
        NoteTrack::new("pad", pad),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_has_playable_tracks() {
        let tracks = demo();
        assert_eq!(tracks.len(), 3);
        for track in &tracks {
            assert!(!track.notes.is_empty());
            assert!(track.notes.iter().all(|n| n.is_renderable() && n.pitch <= 127));
        }
    }

    #[test]
    fn parses_minimal_notes_file() {
        let json = r#"[{"name":"a","notes":[{"pitch":60,"onset_sec":0.0,"duration_sec":0.5}]}]"#;
        let tracks: Vec<NoteTrack> = serde_json::from_str(json).unwrap();
        assert_eq!(tracks[0].notes[0], NoteEvent::new(60, 0.0, 0.5));
    }
}
