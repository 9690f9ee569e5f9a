//! Player - owns the renderer and runs the terminal event loop

use std::time::{Duration, Instant};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use pixelroll::atlas::Atlas;
use pixelroll::clock::AudioClock;
use pixelroll::config::PlayerConfig;
use pixelroll::glyph::{GlyphCatalog, GlyphRegistry};
use pixelroll::raster::Raster;
use pixelroll::renderer::TimelineRenderer;
use pixelroll::scheduler::FrameQueue;
use pixelroll::timeline::{NoteTrack, TimelineBuilder};
use rand::{rngs::SmallRng, SeedableRng};
use ratatui::DefaultTerminal;

use super::audio::HostClock;
use super::sprites::paint_atlas;
use super::ui::{self, TransportInfo};

/// Speeds the `s` key cycles through, in pixels per second
const SPEEDS: [f64; 4] = [100.0, 125.0, 150.0, 180.0];

pub struct Player {
    roll: TimelineRenderer<FrameQueue, Raster, HostClock>,
    tracks: Vec<NoteTrack>,
    builder: TimelineBuilder,
    rng: SmallRng,
    frame_interval: Duration,
    /// Origin of display refresh timestamps
    epoch: Instant,
    viewport: (u16, u16),
    should_quit: bool,
}

impl Player {
    pub fn new(config: PlayerConfig, tracks: Vec<NoteTrack>, seed: Option<u64>) -> EyreResult<Self> {
        let registry = GlyphRegistry::standard();
        let atlas = Atlas::new(paint_atlas(&registry));
        let catalog =
            GlyphCatalog::from_registry(&atlas, &registry).wrap_err("failed to build glyph catalog")?;

        let clock = HostClock::open(config.latency_sec);
        let roll = TimelineRenderer::new(
            catalog,
            Raster::new(1, 1),
            clock,
            FrameQueue::new(),
            config.renderer(),
        );

        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut player = Self {
            roll,
            tracks,
            builder: TimelineBuilder::new(config.timeline()),
            rng,
            frame_interval: Duration::from_secs_f64(config.frame_interval()),
            epoch: Instant::now(),
            viewport: (0, 0),
            should_quit: false,
        };
        player.rebuild();
        Ok(player)
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.fit_viewport(terminal)?;

            // Display refresh
            let timestamp = self.epoch.elapsed().as_secs_f64();
            self.roll.pump(timestamp);

            let info = self.transport_info();
            terminal.draw(|frame| ui::render(frame, &info, self.roll.surface()))?;

            // Handle keyboard input (non-blocking, one refresh interval)
            if event::poll(self.frame_interval)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.roll.stop();
        Ok(())
    }

    /// Resize the surface when the roll area changed
    fn fit_viewport(&mut self, terminal: &DefaultTerminal) -> EyreResult<()> {
        let size = terminal.size()?;
        let area = ui::roll_area(ratatui::layout::Rect::new(0, 0, size.width, size.height));
        if (area.width, area.height) != self.viewport {
            self.viewport = (area.width, area.height);
            // Two pixels per cell vertically
            self.roll
                .update_surface_size(area.width as u32, area.height as u32 * 2);
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                if self.roll.is_playing() {
                    self.roll.stop();
                } else {
                    let now = self.roll.clock().now();
                    self.roll.start(now);
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let current = self.builder.config().speed;
                let next = SPEEDS
                    .iter()
                    .position(|&s| s == current)
                    .map_or(SPEEDS[0], |i| SPEEDS[(i + 1) % SPEEDS.len()]);
                self.builder = self.builder.clone().speed(next);
                self.rebuild();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let next = self.builder.config().random.next();
                self.builder = self.builder.clone().random(next);
                self.rebuild();
            }
            _ => {}
        }
    }

    fn rebuild(&mut self) {
        self.roll.rebuild(&self.builder, &self.tracks, &mut self.rng);
        log::info!(
            "timeline rebuilt: {} notes at {} px/s ({})",
            self.roll.timeline().len(),
            self.builder.config().speed,
            self.builder.config().random
        );
    }

    fn transport_info(&self) -> TransportInfo {
        let surface = self.roll.surface();
        TransportInfo {
            is_playing: self.roll.is_playing(),
            elapsed_sec: self.roll.elapsed(),
            total_sec: self.roll.timeline().duration_sec(),
            speed: self.builder.config().speed,
            random: self.builder.config().random,
            note_count: self.roll.timeline().len(),
            resolution: (surface.width(), surface.height()),
            clock: self.roll.clock().label(),
        }
    }
}
