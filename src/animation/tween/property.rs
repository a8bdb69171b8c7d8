//! Single-property tweener.

use web_time::{Duration, Instant};

use super::{live_target, Channel, Track, TweenClock, TweenStatus};
use crate::animation::transition::Span;
use crate::error::PropertyError;
use crate::host::Animatable;
use crate::util::easing::EasingFunction;

/// Drives one numeric property from `span.from` to `span.to`.
#[derive(Debug, Clone)]
pub struct PropertyTween {
    track: Track,
    clock: TweenClock,
    status: TweenStatus,
}

impl PropertyTween {
    /// Tween `channel` over `span` for `duration`, starting at `start`.
    #[must_use]
    pub fn new(
        channel: Channel,
        span: Span,
        duration: Duration,
        easing: EasingFunction,
        start: Instant,
    ) -> Self {
        Self::with_track(
            Track::new(channel, span, easing),
            TweenClock::new(start, duration),
        )
    }

    pub(super) fn with_track(track: Track, clock: TweenClock) -> Self {
        Self {
            track,
            clock,
            status: TweenStatus::Running,
        }
    }

    /// Write the start value.
    pub fn pre_set(
        &self,
        tile: &mut dyn Animatable,
    ) -> Result<(), PropertyError> {
        self.track.apply(tile, 0.0)
    }

    /// Advance one frame.
    ///
    /// Cancelled when the target is gone, failed when the write is rejected,
    /// finished once progress reaches 1 (after writing the exact end value).
    pub fn step(
        &mut self,
        tile: Option<&mut dyn Animatable>,
        now: Instant,
    ) -> TweenStatus {
        self.status = match live_target(self.status, tile) {
            Ok(tile) => {
                let progress = self.clock.progress(now);
                match self.track.apply(tile, progress) {
                    Ok(()) if progress >= 1.0 => TweenStatus::Finished,
                    Ok(()) => TweenStatus::Running,
                    Err(e) => {
                        log::warn!(
                            "{} tween stopped at {progress:.2}: {e}",
                            self.track.channel.name()
                        );
                        TweenStatus::Failed
                    }
                }
            }
            Err(status) => status,
        };
        self.status
    }
}
