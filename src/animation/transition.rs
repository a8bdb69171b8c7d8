//! Transition catalog: named entrance/exit shapes and their resolved plans.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::snapshot::AnimationSnapshot;
use crate::options::TransitionConfig;
use crate::util::easing::EasingFunction;

/// Edge a slide transition enters from (and exits toward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideEdge {
    /// Negative x.
    Left,
    /// Positive x.
    Right,
    /// Negative y.
    Top,
    /// Positive y.
    Bottom,
}

/// Transition shape selected per tile.
///
/// Kinds are mutually exclusive: a slide never zooms and a zoom never
/// slides. Serializes as its flag name; unknown names deserialize to
/// [`TransitionKind::None`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum TransitionKind {
    /// No animation.
    #[default]
    None,
    /// Opacity only.
    Fade,
    /// Grows from `1 - I` on entry, shrinks back on exit.
    ZoomIn,
    /// Shrinks from `1 + I` on entry, grows back on exit.
    ZoomOut,
    /// Moves in from an edge by `I` of the tile size.
    Slide(SlideEdge),
}

impl TransitionKind {
    /// Every kind, in flag-menu order.
    pub const ALL: [TransitionKind; 8] = [
        TransitionKind::None,
        TransitionKind::Fade,
        TransitionKind::ZoomIn,
        TransitionKind::ZoomOut,
        TransitionKind::Slide(SlideEdge::Left),
        TransitionKind::Slide(SlideEdge::Right),
        TransitionKind::Slide(SlideEdge::Top),
        TransitionKind::Slide(SlideEdge::Bottom),
    ];

    /// Parse a transition name. Unknown names fail closed to
    /// [`TransitionKind::None`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .unwrap_or_else(|| {
                log::debug!("unknown transition type '{name}', using none");
                TransitionKind::None
            })
    }

    /// Name as stored in tile flags.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TransitionKind::None => "none",
            TransitionKind::Fade => "fade_in_out",
            TransitionKind::ZoomIn => "zoom_in_out",
            TransitionKind::ZoomOut => "zoom_out_in",
            TransitionKind::Slide(SlideEdge::Left) => "slide_from_left",
            TransitionKind::Slide(SlideEdge::Right) => "slide_from_right",
            TransitionKind::Slide(SlideEdge::Top) => "slide_from_top",
            TransitionKind::Slide(SlideEdge::Bottom) => "slide_from_bottom",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for TransitionKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<TransitionKind> for String {
    fn from(kind: TransitionKind) -> Self {
        kind.name().to_owned()
    }
}

/// Whether the tile is appearing or disappearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Tile became visible.
    Entering,
    /// Tile became hidden.
    Exiting,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Entering => f.write_str("entrance"),
            Direction::Exiting => f.write_str("exit"),
        }
    }
}

/// Start and end value of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// Value at progress 0.
    pub from: f64,
    /// Value at progress 1.
    pub to: f64,
}

impl Span {
    /// Span from `from` to `to`.
    #[must_use]
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Entering spans run `offset → rest`, exiting spans `rest → offset`.
    fn directed(direction: Direction, rest: f64, offset: f64) -> Self {
        match direction {
            Direction::Entering => Self::new(offset, rest),
            Direction::Exiting => Self::new(rest, offset),
        }
    }

    /// Linear blend at eased progress `t`.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f64) -> f64 {
        self.from + (self.to - self.from) * t
    }
}

/// Movement channel of a plan, paired with the alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// Multiplier on the original scale vector.
    Scale(Span),
    /// Absolute x coordinate.
    X(Span),
    /// Absolute y coordinate.
    Y(Span),
}

/// A transition resolved against one tile at one moment.
///
/// Consumed uniformly by the tweeners: an alpha span, an optional movement
/// span, the run length and the movement easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionPlan {
    /// Transition this plan came from.
    pub kind: TransitionKind,
    /// Entrance or exit.
    pub direction: Direction,
    /// Opacity span, always eased with [`EasingFunction::ALPHA`].
    pub alpha: Span,
    /// Scale or position span, `None` for fades.
    pub movement: Option<Movement>,
    /// Run length.
    pub duration: Duration,
    /// Easing for the movement span.
    pub easing: EasingFunction,
}

impl TransitionPlan {
    /// Resolve `config` for a tile captured in `snapshot`.
    ///
    /// Returns `None` for [`TransitionKind::None`].
    #[must_use]
    pub fn resolve(
        config: &TransitionConfig,
        direction: Direction,
        snapshot: &AnimationSnapshot,
    ) -> Option<Self> {
        let intensity = config.intensity;
        let origin = snapshot.position;
        let shift = snapshot.size * intensity;

        let span = |rest, offset| Span::directed(direction, rest, offset);

        let movement = match config.kind {
            TransitionKind::None => return None,
            TransitionKind::Fade => None,
            TransitionKind::ZoomIn => {
                Some(Movement::Scale(span(1.0, 1.0 - intensity)))
            }
            TransitionKind::ZoomOut => {
                Some(Movement::Scale(span(1.0, 1.0 + intensity)))
            }
            TransitionKind::Slide(edge) => Some(match edge {
                SlideEdge::Left => {
                    Movement::X(span(origin.x, origin.x - shift.x))
                }
                SlideEdge::Right => {
                    Movement::X(span(origin.x, origin.x + shift.x))
                }
                SlideEdge::Top => {
                    Movement::Y(span(origin.y, origin.y - shift.y))
                }
                SlideEdge::Bottom => {
                    Movement::Y(span(origin.y, origin.y + shift.y))
                }
            }),
        };

        Some(Self {
            kind: config.kind,
            direction,
            alpha: Span::directed(direction, snapshot.alpha, 0.0),
            movement,
            duration: config.duration,
            easing: config.easing,
        })
    }
}
