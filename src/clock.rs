//! Audio clock abstraction
//!
//! The renderer never drives playback; it only reads the time reported by
//! whatever engine produces the sound. Hosts adapt their engine's clock to
//! [`AudioClock`].

use std::cell::Cell;
use std::time::Instant;

/// Read-only view of the playback clock
pub trait AudioClock {
    /// Current time in seconds (monotonic)
    fn now(&self) -> f64;

    /// Fixed output latency in seconds, subtracted from elapsed time
    fn latency_seconds(&self) -> f64 {
        0.0
    }
}

impl<C: AudioClock + ?Sized> AudioClock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn latency_seconds(&self) -> f64 {
        (**self).latency_seconds()
    }
}

impl<C: AudioClock + ?Sized> AudioClock for std::rc::Rc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }

    fn latency_seconds(&self) -> f64 {
        (**self).latency_seconds()
    }
}

/// Wall clock measured from construction
#[derive(Debug, Clone)]
pub struct InstantClock {
    origin: Instant,
    latency: f64,
}

impl InstantClock {
    pub fn new(latency: f64) -> Self {
        Self {
            origin: Instant::now(),
            latency,
        }
    }
}

impl Default for InstantClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl AudioClock for InstantClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn latency_seconds(&self) -> f64 {
        self.latency
    }
}

/// Clock advanced explicitly by its owner
///
/// Useful for headless rendering and tests, where frames must be
/// reproducible.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
    latency: f64,
}

impl ManualClock {
    pub fn new(start: f64, latency: f64) -> Self {
        Self {
            now: Cell::new(start),
            latency,
        }
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl AudioClock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn latency_seconds(&self) -> f64 {
        self.latency
    }
}
