use pixelroll::scheduler::{DisplayLink, FrameFlow, FrameHandle, FrameScheduler};

/// Display link that logs every request and cancellation
#[derive(Default)]
struct RecordingLink {
    next_id: u64,
    outstanding: Vec<FrameHandle>,
    requested: usize,
    cancelled: Vec<FrameHandle>,
}

impl DisplayLink for RecordingLink {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.requested += 1;
        let handle = FrameHandle::new(self.next_id);
        self.outstanding.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
        self.outstanding.retain(|&h| h != handle);
    }
}

impl RecordingLink {
    /// Fire the single outstanding request
    fn fire(&mut self) -> FrameHandle {
        assert_eq!(self.outstanding.len(), 1, "exactly one request outstanding");
        self.outstanding.remove(0)
    }
}

struct Probe {
    deltas: Vec<f64>,
    stop_after: Option<usize>,
}

impl Probe {
    fn new() -> Self {
        Self {
            deltas: Vec::new(),
            stop_after: None,
        }
    }
}

fn probe(probe: &mut Probe, delta: f64) -> FrameFlow {
    probe.deltas.push(delta);
    match probe.stop_after {
        Some(n) if probe.deltas.len() >= n => FrameFlow::Stop,
        _ => FrameFlow::Continue,
    }
}

type Loop = FrameScheduler<RecordingLink, fn(&mut Probe, f64) -> FrameFlow>;

fn drive(scheduler: &mut Loop, target: &mut Probe, timestamps: &[f64]) {
    for &ts in timestamps {
        let handle = scheduler.display_mut().fire();
        scheduler.on_frame(handle, ts, target);
    }
}

#[test]
fn first_frame_only_primes_delta() {
    let mut scheduler: Loop = FrameScheduler::new(RecordingLink::default());
    let mut target = Probe::new();
    scheduler.start(probe);

    drive(&mut scheduler, &mut target, &[1.0, 1.25, 1.75]);
    assert_eq!(target.deltas, vec![0.25, 0.5]);
    assert_eq!(scheduler.display().requested, 4);
}

#[test]
fn one_request_outstanding_at_a_time() {
    let mut scheduler: Loop = FrameScheduler::new(RecordingLink::default());
    let mut target = Probe::new();
    scheduler.start(probe);
    for i in 0..10 {
        assert_eq!(scheduler.display().outstanding.len(), 1);
        drive(&mut scheduler, &mut target, &[i as f64]);
    }
    assert_eq!(target.deltas.len(), 9);
}

#[test]
fn restart_cancels_previous_request() {
    let mut scheduler: Loop = FrameScheduler::new(RecordingLink::default());
    scheduler.start(probe);
    let first = scheduler.pending().unwrap();
    scheduler.start(probe);

    let link = scheduler.display();
    assert_eq!(link.cancelled, vec![first]);
    assert_eq!(link.outstanding.len(), 1);
    assert_ne!(scheduler.pending(), Some(first));
}

#[test]
fn stop_is_idempotent() {
    let mut scheduler: Loop = FrameScheduler::new(RecordingLink::default());
    scheduler.stop();
    assert!(scheduler.display().cancelled.is_empty());

    scheduler.start(probe);
    scheduler.stop();
    scheduler.stop();
    assert!(!scheduler.is_running());
    assert_eq!(scheduler.display().cancelled.len(), 1);
    assert!(scheduler.display().outstanding.is_empty());
}

#[test]
fn callback_can_end_the_loop() {
    let mut scheduler: Loop = FrameScheduler::new(RecordingLink::default());
    let mut target = Probe::new();
    target.stop_after = Some(2);
    scheduler.start(probe);

    drive(&mut scheduler, &mut target, &[0.0, 0.1, 0.2]);
    assert_eq!(target.deltas.len(), 2);
    assert!(!scheduler.is_running());
    assert!(scheduler.display().outstanding.is_empty());
    assert_eq!(scheduler.display().requested, 3);
}

#[test]
fn stale_handles_are_ignored() {
    let mut scheduler: Loop = FrameScheduler::new(RecordingLink::default());
    let mut target = Probe::new();
    scheduler.start(probe);
    let stale = scheduler.pending().unwrap();
    scheduler.start(probe);

    assert!(!scheduler.on_frame(stale, 0.0, &mut target));
    drive(&mut scheduler, &mut target, &[0.0, 0.5]);
    assert_eq!(target.deltas, vec![0.5]);

    scheduler.stop();
    assert!(!scheduler.on_frame(FrameHandle::new(99), 1.0, &mut target));
}
