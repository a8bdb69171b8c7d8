//! Frame clock driving the transition loop.

use web_time::{Duration, Instant};

/// Step used by a fixed clock asked for an unlimited rate.
const FALLBACK_FIXED_FPS: u32 = 60;

/// Host frame clock driving the transition loop.
///
/// `Fixed` advances a virtual instant by exactly one frame per call, which
/// keeps headless runs and tests deterministic. `Realtime` paces against the
/// wall clock and tracks a smoothed FPS.
pub struct FrameClock {
    /// Duration of one frame at the target rate
    frame_duration: Duration,
    /// Timestamp of the most recent frame
    last_frame: Instant,
    /// Virtual time instead of wall time
    fixed: bool,
    /// Frames produced so far
    frame_count: u64,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameClock {
    /// Virtual clock stepping `1 / fps` seconds per frame, starting at `start`.
    ///
    /// Virtual time has no wall clock to pace against, so `fps = 0` steps at
    /// 60 fps instead of never advancing.
    #[must_use]
    pub fn fixed(fps: u32, start: Instant) -> Self {
        let fps = if fps == 0 { FALLBACK_FIXED_FPS } else { fps };
        Self::build(fps, start, true)
    }

    /// Wall clock paced to `fps` (0 = unlimited).
    #[must_use]
    pub fn realtime(fps: u32) -> Self {
        Self::build(fps, Instant::now(), false)
    }

    fn build(fps: u32, start: Instant, fixed: bool) -> Self {
        let frame_duration = if fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(fps))
        } else {
            Duration::ZERO
        };

        Self {
            frame_duration,
            last_frame: start,
            fixed,
            frame_count: 0,
            smoothed_fps: if fps > 0 { fps as f32 } else { 60.0 },
            smoothing: 0.05,
        }
    }

    /// Timestamp of the current frame.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.last_frame
    }

    /// Whether enough wall time has passed for the next frame. Always true
    /// for a fixed clock.
    #[must_use]
    pub fn frame_due(&self) -> bool {
        self.fixed || self.last_frame.elapsed() >= self.frame_duration
    }

    /// Time left until the next frame is due.
    #[must_use]
    pub fn until_next_frame(&self) -> Duration {
        if self.fixed {
            return Duration::ZERO;
        }
        self.frame_duration.saturating_sub(self.last_frame.elapsed())
    }

    /// Move to the next frame and return its timestamp.
    pub fn advance(&mut self) -> Instant {
        let now = if self.fixed {
            self.last_frame + self.frame_duration
        } else {
            Instant::now()
        };
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        if frame_time > 0.0 {
            // Exponential moving average for smooth display
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + (1.0 / frame_time) * self.smoothing;
        }
        self.last_frame = now;
        self.frame_count += 1;
        now
    }

    /// Frames advanced so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}
