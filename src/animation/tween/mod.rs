//! Frame-driven tweeners.
//!
//! A tween never schedules anything itself: the coordinator calls
//! [`Tween::step`] once per host frame. Each step re-validates the target,
//! computes `progress = min(elapsed / duration, 1)`, writes every channel and
//! reports a [`TweenStatus`]. Once a step reports a terminal status the tween
//! never writes again.

mod composite;
mod property;

use glam::DVec2;
pub use composite::CompositeTween;
pub use property::PropertyTween;
use web_time::{Duration, Instant};

use super::snapshot::AnimationSnapshot;
use super::transition::{Movement, Span, TransitionPlan};
use crate::error::PropertyError;
use crate::host::Animatable;
use crate::util::easing::EasingFunction;

/// Result of one frame step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenStatus {
    /// More frames needed.
    Running,
    /// Reached `progress >= 1` and wrote the exact end values.
    Finished,
    /// A property write was rejected; the tween stopped.
    Failed,
    /// The target was destroyed or became unreachable.
    Cancelled,
}

impl TweenStatus {
    /// Whether no further frames will run.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, TweenStatus::Running)
    }
}

/// Which tile property a track writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Channel {
    /// Surface opacity.
    Alpha,
    /// Multiplier applied to the captured original scale.
    Scale(DVec2),
    /// Absolute x coordinate.
    X,
    /// Absolute y coordinate.
    Y,
}

impl Channel {
    /// Property name for logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Channel::Alpha => "alpha",
            Channel::Scale(_) => "scale",
            Channel::X => "x",
            Channel::Y => "y",
        }
    }

    fn write(
        self,
        tile: &mut dyn Animatable,
        value: f64,
    ) -> Result<(), PropertyError> {
        match self {
            Channel::Alpha => tile.set_alpha(value),
            Channel::Scale(original) => tile.set_scale(original * value),
            Channel::X => {
                let position = tile.position();
                tile.set_position(DVec2::new(value, position.y))
            }
            Channel::Y => {
                let position = tile.position();
                tile.set_position(DVec2::new(position.x, value))
            }
        }
    }
}

/// One channel interpolated over a span with its own easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Property written.
    pub channel: Channel,
    /// Start and end value.
    pub span: Span,
    /// Easing applied to progress.
    pub easing: EasingFunction,
}

impl Track {
    /// Track over `span` on `channel`.
    #[must_use]
    pub fn new(channel: Channel, span: Span, easing: EasingFunction) -> Self {
        Self {
            channel,
            span,
            easing,
        }
    }

    /// Opacity track, always eased with [`EasingFunction::ALPHA`].
    #[must_use]
    pub fn alpha(span: Span) -> Self {
        Self::new(Channel::Alpha, span, EasingFunction::ALPHA)
    }

    /// Channel value at `progress`. Progress 1 yields the exact end value.
    #[must_use]
    pub fn value_at(&self, progress: f64) -> f64 {
        if progress >= 1.0 {
            self.span.to
        } else {
            self.span.at(self.easing.evaluate(progress))
        }
    }

    /// Write the value at `progress` to `tile`.
    pub fn apply(
        &self,
        tile: &mut dyn Animatable,
        progress: f64,
    ) -> Result<(), PropertyError> {
        self.channel.write(tile, self.value_at(progress))
    }
}

/// Start time and length of a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenClock {
    start: Instant,
    duration: Duration,
}

impl TweenClock {
    /// Clock starting at `start` and running for `duration`.
    #[must_use]
    pub fn new(start: Instant, duration: Duration) -> Self {
        Self { start, duration }
    }

    /// Normalized progress, `min(elapsed / duration, 1)`.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.start);

        if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        }
    }
}

/// A single- or two-channel tween built from a [`TransitionPlan`].
#[derive(Debug, Clone)]
pub enum Tween {
    /// Alpha only (fades).
    Property(PropertyTween),
    /// Movement plus alpha (zooms, slides).
    Composite(CompositeTween),
}

impl Tween {
    /// Build the tween for `plan`, starting at `start`.
    ///
    /// Returns `None` when a scale movement has no captured scale to
    /// multiply against.
    #[must_use]
    pub fn from_plan(
        plan: &TransitionPlan,
        snapshot: &AnimationSnapshot,
        start: Instant,
    ) -> Option<Self> {
        let clock = TweenClock::new(start, plan.duration);
        let alpha = Track::alpha(plan.alpha);

        let Some(movement) = plan.movement else {
            let fade = PropertyTween::with_track(alpha, clock);
            return Some(Tween::Property(fade));
        };

        let primary = match movement {
            Movement::Scale(span) => {
                Track::new(Channel::Scale(snapshot.scale?), span, plan.easing)
            }
            Movement::X(span) => Track::new(Channel::X, span, plan.easing),
            Movement::Y(span) => Track::new(Channel::Y, span, plan.easing),
        };
        Some(Tween::Composite(CompositeTween::new(primary, alpha, clock)))
    }

    /// Synchronously write the start pose (progress 0) before the first
    /// frame.
    pub fn pre_set(
        &self,
        tile: &mut dyn Animatable,
    ) -> Result<(), PropertyError> {
        match self {
            Tween::Property(tween) => tween.pre_set(tile),
            Tween::Composite(tween) => tween.pre_set(tile),
        }
    }

    /// Advance one frame. `tile` is `None` when the host no longer has it.
    pub fn step(
        &mut self,
        tile: Option<&mut dyn Animatable>,
        now: Instant,
    ) -> TweenStatus {
        match self {
            Tween::Property(tween) => tween.step(tile, now),
            Tween::Composite(tween) => tween.step(tile, now),
        }
    }
}

/// Shared per-frame preamble: settle terminal tweens and check liveness.
///
/// Returns the live target, or the status the step must report.
fn live_target<'a>(
    status: TweenStatus,
    tile: Option<&'a mut dyn Animatable>,
) -> Result<&'a mut dyn Animatable, TweenStatus> {
    if status.is_terminal() {
        return Err(status);
    }
    match tile {
        Some(tile) if tile.is_live() => Ok(tile),
        _ => Err(TweenStatus::Cancelled),
    }
}
