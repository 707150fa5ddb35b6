use std::time::{Duration, Instant};

/// Minimum spacing between accepted layout passes under sustained input.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(500);

/// Every Nth event forces a pass even inside the interval, so bursts do not
/// leave the view visibly stale.
pub const DEFAULT_BURST_STRIDE: u32 = 64;

/// Gates how often a layout-and-render pass may run.
///
/// Callers report ingested events through `on_event` and ask once per
/// rendered frame, via `poll`, whether a pass is due. At most one pass is
/// granted per frame and per interval; a dirty tree is always granted a
/// trailing pass once events stop arriving. After `stop` nothing is granted
/// again, including passes that were already armed.
pub struct ThrottleScheduler {
    min_interval: Duration,
    burst_stride: u32,
    events_since_pass: u32,
    last_pass: Option<Instant>,
    dirty: bool,
    armed: bool,
    stopped: bool,
}

impl ThrottleScheduler {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MIN_INTERVAL, DEFAULT_BURST_STRIDE)
    }

    pub fn with_config(min_interval: Duration, burst_stride: u32) -> Self {
        Self {
            min_interval,
            burst_stride: burst_stride.max(1),
            events_since_pass: 0,
            last_pass: None,
            dirty: false,
            armed: false,
            stopped: false,
        }
    }

    /// Record one ingested event at `now`. Arms a pass when one is due;
    /// re-arming while already armed coalesces into a no-op.
    pub fn on_event(&mut self, now: Instant) {
        if self.stopped {
            return;
        }
        self.dirty = true;
        self.events_since_pass = self.events_since_pass.saturating_add(1);
        if self.should_run(now) {
            self.armed = true;
        }
    }

    /// Mark the tree changed without counting a stream event (used when an
    /// authoritative snapshot replaces the live tree).
    pub fn mark_dirty(&mut self) {
        if !self.stopped {
            self.dirty = true;
            self.armed = true;
        }
    }

    /// Whether a pass would be accepted at `now`. True at most once per
    /// interval since the last accepted pass, or when the burst trigger
    /// fires.
    pub fn should_run(&self, now: Instant) -> bool {
        if self.stopped || !self.dirty {
            return false;
        }
        if self.events_since_pass >= self.burst_stride {
            return true;
        }
        match self.last_pass {
            None => true,
            Some(at) => now.duration_since(at) >= self.min_interval,
        }
    }

    /// Frame-aligned grant. Returns true at most once per due window; the
    /// caller must run exactly one layout pass when it does. Also carries
    /// the trailing edge: a dirty scheduler is granted a pass once the
    /// interval elapses even with no further events.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.stopped {
            return false;
        }
        if self.armed || self.should_run(now) {
            self.armed = false;
            self.dirty = false;
            self.events_since_pass = 0;
            self.last_pass = Some(now);
            return true;
        }
        false
    }

    /// Tear down: no further pass is granted, armed or not.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.armed = false;
        self.dirty = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl Default for ThrottleScheduler {
    fn default() -> Self {
        Self::new()
    }
}
