//! Two-channel tweener: a movement channel plus alpha.

use web_time::Instant;

use super::{live_target, Track, TweenClock, TweenStatus};
use crate::error::PropertyError;
use crate::host::Animatable;

/// Drives a movement channel (scale or position) and the alpha channel on
/// one clock.
///
/// Both channels are written within the same step, movement first, so a
/// reader polling between frames never sees them out of step.
#[derive(Debug, Clone)]
pub struct CompositeTween {
    movement: Track,
    alpha: Track,
    clock: TweenClock,
    status: TweenStatus,
}

impl CompositeTween {
    /// Tween `movement` and `alpha` together on `clock`.
    #[must_use]
    pub fn new(movement: Track, alpha: Track, clock: TweenClock) -> Self {
        Self {
            movement,
            alpha,
            clock,
            status: TweenStatus::Running,
        }
    }

    /// Write the start pose for both channels.
    pub fn pre_set(
        &self,
        tile: &mut dyn Animatable,
    ) -> Result<(), PropertyError> {
        self.alpha.apply(tile, 0.0)?;
        self.movement.apply(tile, 0.0)
    }

    /// Advance one frame.
    pub fn step(
        &mut self,
        tile: Option<&mut dyn Animatable>,
        now: Instant,
    ) -> TweenStatus {
        self.status = match live_target(self.status, tile) {
            Ok(tile) => {
                let progress = self.clock.progress(now);
                let written = self
                    .movement
                    .apply(tile, progress)
                    .and_then(|()| self.alpha.apply(tile, progress));
                match written {
                    Ok(()) if progress >= 1.0 => TweenStatus::Finished,
                    Ok(()) => TweenStatus::Running,
                    Err(e) => {
                        log::warn!(
                            "{}+alpha tween stopped at {progress:.2}: {e}",
                            self.movement.channel.name()
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
