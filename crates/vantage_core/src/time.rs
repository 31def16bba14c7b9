//! Frame timing utilities.
//!
//! `Time` is produced once per frame by the application runner.  The VR
//! compositor's pose wait paces the loop, so `delta` normally sits near the
//! HMD refresh interval; the clamp only matters on load hitches (e.g. a
//! first-time render-model upload).

/// A snapshot of timing information for the current frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    /// Seconds elapsed since the previous frame, clamped to 0.1.
    pub delta: f32,
    /// Total seconds elapsed since the application started.
    pub elapsed: f64,
    /// Number of frames rendered so far (starts at 0 for the first frame).
    pub frame_count: u64,
    /// Instantaneous frames-per-second derived from `delta`.
    pub fps: f32,
}

/// Stateful timer that accumulates time and produces [`Time`] snapshots.
pub struct TimeClock {
    start: std::time::Instant,
    last_tick: std::time::Instant,
    frame_count: u64,
}

impl TimeClock {
    pub fn new() -> Self {
        let now = std::time::Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_count: 0,
        }
    }

    /// Advance by one frame.  Returns the [`Time`] snapshot for this frame.
    pub fn tick(&mut self) -> Time {
        let now = std::time::Instant::now();
        let raw_dt = (now - self.last_tick).as_secs_f32();
        let delta = raw_dt.min(0.1);
        let elapsed = (now - self.start).as_secs_f64();
        let fps = if delta > 0.0 { 1.0 / delta } else { 0.0 };
        let count = self.frame_count;

        self.last_tick = now;
        self.frame_count += 1;

        Time {
            delta,
            elapsed,
            frame_count: count,
            fps,
        }
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}
