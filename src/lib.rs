//! Pixel-art piano roll that scrolls in time with an audio clock.
//!
//! Notes move right-to-left past a fixed playhead. Each note is drawn with a
//! sprite cropped from a pixel-art atlas, chosen by the note's on-screen
//! width, and is outlined while it crosses the playhead.
//!
//! ```no_run
//! use pixelroll::prelude::*;
//! # fn atlas() -> Raster { Raster::new(202, 38) }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = GlyphCatalog::new(&Atlas::new(atlas()))?;
//! let mut roll = TimelineRenderer::new(
//!     catalog,
//!     Raster::new(1, 1),
//!     InstantClock::default(),
//!     FrameQueue::new(),
//!     RendererConfig::default(),
//! );
//! roll.update_surface_size(1280, 720);
//! let tracks = vec![NoteTrack::new("lead", vec![NoteEvent::new(60, 0.0, 0.5)])];
//! roll.rebuild(&TimelineBuilder::default(), &tracks, &mut rand::rng());
//! roll.start(0.0);
//! roll.pump(0.0);
//! # Ok(())
//! # }
//! ```

pub mod atlas;
pub mod clock;
#[cfg(feature = "serde")]
pub mod config;
pub mod geometry; // Integer pixel rectangles
pub mod glyph; // Note sprites and their selection
pub mod raster;
pub mod renderer;
pub mod scheduler; // Per-display-frame loop
pub mod timeline;

pub mod prelude {
    pub use crate::atlas::{Atlas, AtlasError};
    pub use crate::clock::{AudioClock, InstantClock, ManualClock};
    pub use crate::geometry::{Rect, Vec2};
    pub use crate::glyph::{Glyph, GlyphCatalog, GlyphId, GlyphRegistry};
    pub use crate::raster::{Color, Raster, Surface};
    pub use crate::renderer::{PlaybackState, RendererConfig, TimelineRenderer};
    pub use crate::scheduler::{DisplayLink, FrameFlow, FrameHandle, FrameQueue, FrameScheduler};
    pub use crate::timeline::{
        NoteEvent, NoteTrack, RandomMode, Timeline, TimelineBuilder, TimelineConfig,
    };
}
