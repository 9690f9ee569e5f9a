//! Timeline renderer - draws the scrolling piano roll each display frame
//!
//! The playhead is a fixed vertical line a quarter of the way across the
//! surface. Notes scroll right-to-left past it at their own speed; a note
//! whose drawn span currently covers the playhead is drawn highlighted.
//!
//! Every state change (start, stop, resize, new timeline) renders one frame
//! synchronously so the surface is never stale.

use rand::Rng;

use crate::clock::AudioClock;
use crate::geometry::Rect;
use crate::glyph::GlyphCatalog;
use crate::raster::{Color, Surface};
use crate::scheduler::{DisplayLink, FrameFlow, FrameHandle, FrameQueue, FrameScheduler};
use crate::timeline::{NoteTrack, Timeline, TimelineBuilder};

/// Default vertical resolution the surface is scaled toward
pub const DEFAULT_TARGET_RESOLUTION: u32 = 300;

/// Rows kept free below the lowest note
const VERTICAL_MARGIN: f64 = 16.0;
/// Baseline of the highest note
const TOP_BASELINE: f64 = 15.0;

/// Playback position source for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlaybackState {
    /// Frozen at timeline position zero
    #[default]
    Stopped,
    /// `reference_sec` is the clock time of timeline position zero
    Playing { reference_sec: f64 },
}

/// Renderer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RendererConfig {
    /// Vertical pixel count the viewport is downscaled toward, by whole
    /// factors only
    pub target_resolution: u32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            target_resolution: DEFAULT_TARGET_RESOLUTION,
        }
    }
}

/// Everything a frame needs; the scheduler callback's target
struct View<S, C> {
    catalog: GlyphCatalog,
    timeline: Timeline,
    surface: S,
    clock: C,
    playback: PlaybackState,
    vertical_resolution: u32,
    playhead_offset: f64,
    frames: u64,
    /// Notes drawn by the latest frame
    last_drawn: usize,
}

type FrameFn<S, C> = fn(&mut View<S, C>, f64) -> FrameFlow;

fn render_frame<S: Surface, C: AudioClock>(view: &mut View<S, C>, _delta: f64) -> FrameFlow {
    view.render();
    FrameFlow::Continue
}

impl<S: Surface, C: AudioClock> View<S, C> {
    fn elapsed(&self) -> f64 {
        match self.playback {
            PlaybackState::Playing { reference_sec } => {
                self.clock.now() - reference_sec - self.clock.latency_seconds()
            }
            PlaybackState::Stopped => 0.0,
        }
    }

    fn render(&mut self) {
        let elapsed = self.elapsed();
        let playhead = self.playhead_offset;
        let vres = self.vertical_resolution;

        let surface = &mut self.surface;
        surface.clear();
        surface.set_smoothing(false);

        let shade = (128.0 + 50.0 * (3.0 * elapsed).sin()).round() as u8;
        surface.fill_rect(
            Rect::new(playhead.floor() as i32, 0, 1, vres as i32),
            Color::gray(shade),
        );

        let range = self.timeline.pitch_range();
        let surface_width = surface.width() as i32;
        let mut drawn = 0usize;

        for note in self.timeline.notes() {
            let Some(glyph) = self.catalog.glyph(note.glyph()) else {
                continue;
            };
            let x = note.screen_x(elapsed, playhead);
            // Right edge in i64, long notes get close to i32::MAX
            let right = x as i64 + glyph.render_width(note.width()) as i64;
            if right < 0 || x > surface_width {
                continue;
            }

            let y = range.normalized_from_top(note.pitch()) * (vres as f64 - VERTICAL_MARGIN)
                + TOP_BASELINE;
            let highlight = x as f64 <= playhead && right as f64 > playhead;
            glyph.draw(surface, x, y.round() as i32, note.width(), highlight);
            drawn += 1;
        }

        self.frames += 1;
        self.last_drawn = drawn;
        log::trace!(
            "frame {}: elapsed {:.3}s, {} of {} notes drawn",
            self.frames,
            elapsed,
            drawn,
            self.timeline.len()
        );
    }
}

/// Owns playback state and draws the timeline onto a surface
///
/// `D` delivers display refreshes, `S` is the drawing surface and `C` the
/// audio clock the picture follows.
pub struct TimelineRenderer<D, S, C> {
    scheduler: FrameScheduler<D, FrameFn<S, C>>,
    view: View<S, C>,
    config: RendererConfig,
    pixel_scale: u32,
}

impl<D: DisplayLink, S: Surface, C: AudioClock> TimelineRenderer<D, S, C> {
    /// Create a stopped renderer with an empty timeline
    ///
    /// The surface keeps its current size until
    /// [`update_surface_size`](Self::update_surface_size) is called.
    pub fn new(catalog: GlyphCatalog, surface: S, clock: C, display: D, config: RendererConfig) -> Self {
        let vertical_resolution = surface.height();
        let playhead_offset = surface.width() as f64 / 4.0;
        Self {
            scheduler: FrameScheduler::new(display),
            view: View {
                catalog,
                timeline: Timeline::EMPTY,
                surface,
                clock,
                playback: PlaybackState::Stopped,
                vertical_resolution,
                playhead_offset,
                frames: 0,
                last_drawn: 0,
            },
            config,
            pixel_scale: 1,
        }
    }

    /// Start following the clock; `reference_sec` is the clock time at
    /// which the timeline starts
    pub fn start(&mut self, reference_sec: f64) {
        log::info!("playback started (reference {:.3}s)", reference_sec);
        self.view.playback = PlaybackState::Playing { reference_sec };
        self.scheduler.start(render_frame::<S, C>);
        self.view.render();
    }

    /// Stop the frame loop and redraw frozen at position zero
    pub fn stop(&mut self) {
        log::info!("playback stopped");
        self.view.playback = PlaybackState::Stopped;
        self.scheduler.stop();
        self.view.render();
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.view.playback, PlaybackState::Playing { .. })
    }

    pub fn playback(&self) -> PlaybackState {
        self.view.playback
    }

    /// Current timeline position in seconds (zero when stopped)
    pub fn elapsed(&self) -> f64 {
        self.view.elapsed()
    }

    /// Fit the surface to a viewport of `width` x `height` device pixels
    ///
    /// The viewport is downscaled by a whole factor so that the vertical
    /// resolution lands near the target; pixel art stays on integer
    /// multiples. Returns the chosen factor.
    pub fn update_surface_size(&mut self, width: u32, height: u32) -> u32 {
        let target = self.config.target_resolution.max(1);
        let scale = (height / target).max(1);
        let vres = height / scale;
        let hres = if height == 0 {
            width / scale
        } else {
            (width as u64 * vres as u64 / height as u64) as u32
        };

        log::debug!(
            "surface {}x{} -> {}x{} (scale {})",
            width,
            height,
            hres,
            vres,
            scale
        );

        self.view.surface.resize(hres, vres);
        self.view.vertical_resolution = vres;
        self.view.playhead_offset = hres as f64 / 4.0;
        self.pixel_scale = scale;
        self.view.render();
        scale
    }

    /// Build a new timeline from `tracks` with this renderer's catalog and
    /// redraw
    ///
    /// Timelines only come in this way, so every glyph id they carry
    /// belongs to the catalog.
    pub fn rebuild<R: Rng + ?Sized>(
        &mut self,
        builder: &TimelineBuilder,
        tracks: &[NoteTrack],
        rng: &mut R,
    ) {
        self.view.timeline = builder.build(tracks, &self.view.catalog, rng);
        self.view.render();
    }

    pub fn timeline(&self) -> &Timeline {
        &self.view.timeline
    }

    pub fn catalog(&self) -> &GlyphCatalog {
        &self.view.catalog
    }

    pub fn surface(&self) -> &S {
        &self.view.surface
    }

    pub fn clock(&self) -> &C {
        &self.view.clock
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Whole-number factor from viewport pixels to surface pixels
    pub fn pixel_scale(&self) -> u32 {
        self.pixel_scale
    }

    /// Playhead x position in surface pixels
    pub fn playhead_offset(&self) -> f64 {
        self.view.playhead_offset
    }

    pub fn vertical_resolution(&self) -> u32 {
        self.view.vertical_resolution
    }

    /// Frames drawn so far, scheduled or synchronous
    pub fn frames_rendered(&self) -> u64 {
        self.view.frames
    }

    /// Notes that survived culling in the latest frame
    pub fn notes_drawn(&self) -> usize {
        self.view.last_drawn
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn display(&self) -> &D {
        self.scheduler.display()
    }

    pub fn display_mut(&mut self) -> &mut D {
        self.scheduler.display_mut()
    }

    /// Draw one frame now
    pub fn render(&mut self) {
        self.view.render();
    }

    /// Deliver a fired display frame; returns whether a frame was drawn
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: f64) -> bool {
        self.scheduler.on_frame(handle, timestamp, &mut self.view)
    }
}

impl<S: Surface, C: AudioClock> TimelineRenderer<FrameQueue, S, C> {
    /// Fire every due frame request at `timestamp`; returns frames drawn
    pub fn pump(&mut self, timestamp: f64) -> usize {
        let due = self.scheduler.display_mut().take_due();
        due.into_iter()
            .filter(|&handle| self.on_frame(handle, timestamp))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Atlas;
    use crate::clock::ManualClock;
    use crate::glyph::{BucketSpec, GlyphRegistry};
    use crate::raster::Raster;
    use crate::timeline::NoteEvent;
    use rand::{rngs::SmallRng, SeedableRng};
    use std::rc::Rc;

    type TestRenderer = TimelineRenderer<FrameQueue, Raster, Rc<ManualClock>>;

    fn renderer(clock: Rc<ManualClock>) -> TestRenderer {
        let (w, h) = GlyphRegistry::standard().required_atlas_size();
        let mut atlas = Raster::new(w, h);
        atlas.fill_rect(atlas.bounds(), Color::rgb(200, 40, 40));
        let catalog = GlyphCatalog::new(&Atlas::new(atlas)).unwrap();
        TimelineRenderer::new(
            catalog,
            Raster::new(1, 1),
            clock,
            FrameQueue::new(),
            RendererConfig::default(),
        )
    }

    #[test]
    fn resize_picks_integer_scale() {
        let mut r = renderer(Rc::new(ManualClock::default()));
        assert_eq!(r.update_surface_size(1600, 900), 3);
        assert_eq!(r.vertical_resolution(), 300);
        assert_eq!(r.surface().width(), 533);
        assert_eq!(r.playhead_offset(), 533.0 / 4.0);

        assert_eq!(r.update_surface_size(400, 200), 1);
        assert_eq!((r.surface().width(), r.surface().height()), (400, 200));
        assert_eq!(r.playhead_offset(), 100.0);
    }

    #[test]
    fn elapsed_follows_clock_minus_latency() {
        let clock = Rc::new(ManualClock::new(10.0, 0.1));
        let mut r = renderer(clock.clone());
        assert_eq!(r.elapsed(), 0.0);
        r.start(10.0);
        clock.advance(2.0);
        assert!((r.elapsed() - 1.9).abs() < 1e-9);
        r.stop();
        assert_eq!(r.elapsed(), 0.0);
    }

    #[test]
    fn state_changes_render_once() {
        let mut r = renderer(Rc::new(ManualClock::default()));
        r.update_surface_size(200, 100);
        assert_eq!(r.frames_rendered(), 1);
        r.start(0.0);
        assert_eq!(r.frames_rendered(), 2);
        r.rebuild(&TimelineBuilder::default(), &[], &mut SmallRng::seed_from_u64(1));
        assert_eq!(r.frames_rendered(), 3);
        r.stop();
        assert_eq!(r.frames_rendered(), 4);
    }

    #[test]
    fn pump_draws_after_first_refresh() {
        let mut r = renderer(Rc::new(ManualClock::default()));
        r.update_surface_size(200, 100);
        r.start(0.0);
        assert_eq!(r.pump(0.0), 0);
        assert_eq!(r.pump(0.016), 1);
        assert_eq!(r.pump(0.032), 1);
        assert_eq!(r.display().pending_count(), 1);
        r.stop();
        assert_eq!(r.display().pending_count(), 0);
        assert_eq!(r.pump(0.048), 0);
    }

    #[test]
    fn playhead_line_gray_at_rest() {
        let mut r = renderer(Rc::new(ManualClock::default()));
        r.update_surface_size(200, 100);
        let x = r.playhead_offset().floor() as i32;
        for y in [0, 50, 99] {
            assert_eq!(r.surface().pixel(x, y), Some(Color::gray(128)));
        }
        assert_eq!(r.surface().pixel(x + 1, 50), Some(Color::TRANSPARENT));
    }

    #[test]
    fn notes_with_foreign_glyphs_are_skipped() {
        let mut r = renderer(Rc::new(ManualClock::default()));
        r.update_surface_size(400, 200);

        // Nine glyphs, so its long tile id does not exist in the standard five
        let registry = GlyphRegistry {
            short: vec![BucketSpec {
                target_width: 20.0,
                variants: (0..8).map(|i| Rect::new(i * 10, 0, 10, 6)).collect(),
            }],
            long: Rect::new(80, 0, 12, 6),
            long_threshold: 70.0,
        };
        let mut atlas = Raster::new(92, 6);
        atlas.fill_rect(atlas.bounds(), Color::WHITE);
        let other = GlyphCatalog::from_registry(&Atlas::new(atlas), &registry).unwrap();
        let tracks = vec![NoteTrack::new("t", vec![NoteEvent::new(60, 0.0, 1.0)])];
        r.view.timeline =
            TimelineBuilder::default().build(&tracks, &other, &mut SmallRng::seed_from_u64(3));
        assert!(r.catalog().glyph(r.timeline().notes()[0].glyph()).is_none());

        r.render();
        assert_eq!(r.notes_drawn(), 0);
    }

    #[test]
    fn rebuild_uses_own_catalog() {
        let mut r = renderer(Rc::new(ManualClock::default()));
        r.update_surface_size(200, 100);
        let tracks = vec![NoteTrack::new("t", vec![NoteEvent::new(60, 0.0, 1.0)])];
        r.rebuild(
            &TimelineBuilder::default(),
            &tracks,
            &mut SmallRng::seed_from_u64(2),
        );
        assert_eq!(r.timeline().len(), 1);
        assert_eq!(r.timeline().notes()[0].glyph(), r.catalog().long_glyph());
        assert_eq!(r.notes_drawn(), 1);
    }
}
