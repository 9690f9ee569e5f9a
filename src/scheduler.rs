//! Frame scheduler - a self-rescheduling per-display-frame loop
//!
//! The display side is abstracted as a [`DisplayLink`]: something that can
//! be asked for "one callback at the next refresh" and that can cancel such
//! a request. [`FrameScheduler`] turns that one-shot primitive into a loop:
//! every time a requested frame fires it runs the callback and, if it is
//! still running, requests the next one.
//!
//! The callback gets mutable access to a target owned by the caller, which
//! keeps the scheduler free of shared ownership. Returning
//! [`FrameFlow::Stop`] from the callback has the same effect as calling
//! [`FrameScheduler::stop`] from inside it.

/// Identifies one outstanding display-frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u64 {
        self.0
    }
}

/// One-shot display refresh requests
pub trait DisplayLink {
    /// Ask for a callback at the next display refresh
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request; unknown or already-fired handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A [`DisplayLink`] pumped by the host once per refresh
///
/// The host calls [`FrameQueue::take_due`] when the display refreshes and
/// hands each returned handle back to the scheduler's owner.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every request waiting for this refresh
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl DisplayLink for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|&h| h != handle);
    }
}

/// What the scheduler should do after a frame callback returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFlow {
    /// Keep the loop going
    Continue,
    /// Stop the loop; no further frames are requested
    Stop,
}

enum SchedulerState<F> {
    Stopped,
    Running {
        callback: F,
        /// The single outstanding request, if any
        pending: Option<FrameHandle>,
        /// Timestamp of the previous frame (None before the first one)
        last_timestamp: Option<f64>,
    },
}

/// Drives a callback once per display refresh until stopped
///
/// At most one frame request is outstanding at any time.
pub struct FrameScheduler<D, F> {
    display: D,
    state: SchedulerState<F>,
}

impl<D: DisplayLink, F> FrameScheduler<D, F> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            state: SchedulerState::Stopped,
        }
    }

    /// Start the loop with `callback`, stopping any previous loop first
    pub fn start(&mut self, callback: F) {
        self.stop();
        let pending = Some(self.display.request_frame());
        self.state = SchedulerState::Running {
            callback,
            pending,
            last_timestamp: None,
        };
    }

    /// Cancel the pending request and stop; safe to call when stopped
    pub fn stop(&mut self) {
        if let SchedulerState::Running {
            pending: Some(handle),
            ..
        } = self.state
        {
            self.display.cancel_frame(handle);
        }
        self.state = SchedulerState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running { .. })
    }

    /// The outstanding request, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        match self.state {
            SchedulerState::Running { pending, .. } => pending,
            SchedulerState::Stopped => None,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Handle a fired display frame
    ///
    /// `timestamp` is the refresh time in seconds. The callback receives
    /// `target` and the seconds elapsed since the previous frame; the first
    /// frame after `start` only records its timestamp. Handles that are not
    /// the outstanding request (cancelled or stale) are ignored.
    ///
    /// Returns whether the callback ran.
    pub fn on_frame<T>(&mut self, handle: FrameHandle, timestamp: f64, target: &mut T) -> bool
    where
        F: FnMut(&mut T, f64) -> FrameFlow,
    {
        let Self { display, state } = self;
        let SchedulerState::Running {
            callback,
            pending,
            last_timestamp,
        } = state
        else {
            return false;
        };
        if *pending != Some(handle) {
            return false;
        }
        *pending = None;

        let mut ran = false;
        if let Some(last) = last_timestamp.replace(timestamp) {
            ran = true;
            if callback(target, timestamp - last) == FrameFlow::Stop {
                *state = SchedulerState::Stopped;
                return ran;
            }
        }

        *pending = Some(display.request_frame());
        ran
    }
}
