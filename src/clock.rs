//! Wall-clock frame timing.

use web_time::{Duration, Instant};

/// Measures the time elapsed between frames.
///
/// Long stalls (a dragged window, a breakpoint) are clamped to `max_dt` so a
/// single frame never teleports the forklift through a wall.
#[derive(Copy, Clone, Debug)]
pub struct FrameClock {
    last: Instant,
    max_dt: f32,
    elapsed: Duration,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        FrameClock::new(0.1)
    }
}

impl FrameClock {
    /// Starts a clock that never reports more than `max_dt` seconds per frame.
    pub fn new(max_dt: f32) -> FrameClock {
        FrameClock {
            last: Instant::now(),
            max_dt: max_dt.max(0.0),
            elapsed: Duration::ZERO,
            frames: 0,
        }
    }

    /// Seconds since the previous call (or since creation), clamped.
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;
        self.elapsed += dt;
        self.frames += 1;

        dt.as_secs_f32().min(self.max_dt)
    }

    /// The largest delta ever reported.
    #[inline]
    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }

    /// Unclamped wall time accumulated over every [`delta`](Self::delta) call.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Number of [`delta`](Self::delta) calls so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
