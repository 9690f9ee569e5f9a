//! Audio clock backed by the default output device
//!
//! The stream plays silence; it only exists so the picture follows the
//! device's sample clock rather than the wall clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use pixelroll::clock::{AudioClock, InstantClock};

/// Clock counting the frames an output stream has consumed
pub struct DeviceClock {
    frames: Arc<AtomicU64>,
    sample_rate: f64,
    latency: f64,
    _stream: cpal::Stream,
}

impl DeviceClock {
    /// Open the default output device and start a silent stream
    pub fn open(latency: f64) -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f64;
        let channels = (config.channels() as usize).max(1);
        log::info!(
            "audio clock on {} ({} Hz, {} channels)",
            device.name().unwrap_or_else(|_| "unknown device".into()),
            sample_rate,
            channels
        );

        let frames = Arc::new(AtomicU64::new(0));
        let counter = frames.clone();
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    data.fill(0.0);
                    counter.fetch_add((data.len() / channels) as u64, Ordering::Relaxed);
                },
                |err| log::error!("audio stream error: {}", err),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        Ok(Self {
            frames,
            sample_rate,
            latency,
            _stream: stream,
        })
    }
}

impl AudioClock for DeviceClock {
    fn now(&self) -> f64 {
        self.frames.load(Ordering::Relaxed) as f64 / self.sample_rate
    }

    fn latency_seconds(&self) -> f64 {
        self.latency
    }
}

/// The device clock, or the system clock when no device can be opened
pub enum HostClock {
    Device(DeviceClock),
    System(InstantClock),
}

impl HostClock {
    pub fn open(latency: f64) -> Self {
        match DeviceClock::open(latency) {
            Ok(clock) => HostClock::Device(clock),
            Err(err) => {
                log::warn!("falling back to system clock: {:#}", err);
                HostClock::System(InstantClock::new(latency))
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HostClock::Device(_) => "audio",
            HostClock::System(_) => "system",
        }
    }
}

impl AudioClock for HostClock {
    fn now(&self) -> f64 {
        match self {
            HostClock::Device(clock) => clock.now(),
            HostClock::System(clock) => clock.now(),
        }
    }

    fn latency_seconds(&self) -> f64 {
        match self {
            HostClock::Device(clock) => clock.latency_seconds(),
            HostClock::System(clock) => clock.latency_seconds(),
        }
    }
}
