//! Speed randomization modes
//!
//! Randomization spreads notes apart horizontally so overlapping parts stay
//! readable. The spread is applied either once per track or independently
//! per note, scaled by a fraction of the baseline speed.

use rand::Rng;

/// Where a random speed offset is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomScope {
    PerTrack,
    PerNote,
}

/// Horizontal speed randomization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RandomMode {
    /// Every note moves at the baseline speed
    #[default]
    None,
    PerTrackSmall,
    PerTrackMedium,
    PerTrackLarge,
    PerNoteSmall,
    PerNoteMedium,
    PerNoteLarge,
}

impl RandomMode {
    /// Every mode, in selector order
    pub const ALL: [RandomMode; 7] = [
        RandomMode::None,
        RandomMode::PerTrackSmall,
        RandomMode::PerTrackMedium,
        RandomMode::PerTrackLarge,
        RandomMode::PerNoteSmall,
        RandomMode::PerNoteMedium,
        RandomMode::PerNoteLarge,
    ];

    /// Scope and fraction of the baseline speed, or `None` when disabled
    pub fn spread(&self) -> Option<(RandomScope, f64)> {
        let scope = match self {
            RandomMode::None => return None,
            RandomMode::PerTrackSmall | RandomMode::PerTrackMedium | RandomMode::PerTrackLarge => {
                RandomScope::PerTrack
            }
            _ => RandomScope::PerNote,
        };
        let fraction = match self {
            RandomMode::PerTrackSmall | RandomMode::PerNoteSmall => 0.1,
            RandomMode::PerTrackMedium | RandomMode::PerNoteMedium => 0.2,
            _ => 0.4,
        };
        Some((scope, fraction))
    }

    /// Spread fraction if this mode randomizes at `scope`
    pub fn fraction_for(&self, scope: RandomScope) -> Option<f64> {
        self.spread()
            .filter(|&(s, _)| s == scope)
            .map(|(_, fraction)| fraction)
    }

    /// The mode after this one, wrapping around
    pub fn next(&self) -> RandomMode {
        let i = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RandomMode::None => "Off",
            RandomMode::PerTrackSmall => "Per Track Small",
            RandomMode::PerTrackMedium => "Per Track Medium",
            RandomMode::PerTrackLarge => "Per Track Large",
            RandomMode::PerNoteSmall => "Per Note Small",
            RandomMode::PerNoteMedium => "Per Note Medium",
            RandomMode::PerNoteLarge => "Per Note Large",
        }
    }
}

impl std::fmt::Display for RandomMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Linear interpolation between `a` and `b` by a fresh random fraction
fn rand_range<R: Rng + ?Sized>(a: f64, b: f64, rng: &mut R) -> f64 {
    a + (b - a) * rng.random::<f64>()
}

/// `baseline` shifted by a random amount within `±fraction * baseline`
///
/// The offset is a random fraction of a random point in the range, which
/// biases results toward the baseline. Since `fraction < 1` the result stays
/// strictly positive for a positive baseline.
pub fn randomized_speed<R: Rng + ?Sized>(baseline: f64, fraction: f64, rng: &mut R) -> f64 {
    let scale = rng.random::<f64>();
    let spread = fraction * baseline;
    baseline + scale * rand_range(-spread, spread, rng)
}
