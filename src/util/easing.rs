//! Easing functions for transition interpolation.
//!
//! Every curve maps normalized progress in `[0, 1]` to eased progress in
//! `[0, 1]` and satisfies `f(0) = 0`, `f(1) = 1`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bounce-out segment breakpoints (`t < 1/2.75`, `t < 2/2.75`, ...).
const BOUNCE_DIVISOR: f64 = 2.75;
const BOUNCE_AMPLITUDE: f64 = 7.5625;

/// Easing function variants selectable per tile.
///
/// Serializes as its flag name; unknown names deserialize to `Ease`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in-out.
    #[default]
    Ease,
    /// Piecewise quadratic bounce-out.
    Bounce,
}

impl EasingFunction {
    /// Curve used for every opacity channel, whatever the tile selected.
    ///
    /// Bounce or linear fades look jarring, so alpha always eases.
    pub const ALPHA: EasingFunction = EasingFunction::Ease;

    /// All built-in curves.
    pub const ALL: [EasingFunction; 3] = [
        EasingFunction::Linear,
        EasingFunction::Ease,
        EasingFunction::Bounce,
    ];

    /// Evaluate the easing function at progress `t`.
    ///
    /// Input is clamped to `[0.0, 1.0]`.
    #[inline]
    #[must_use]
    pub fn evaluate(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::Ease => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let k = -2.0 * t + 2.0;
                    1.0 - k * k / 2.0
                }
            }
            EasingFunction::Bounce => bounce_out(t),
        }
    }

    /// Parse a timing-function name. Unknown names fail closed to
    /// [`EasingFunction::Ease`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "linear" => EasingFunction::Linear,
            "bounce" => EasingFunction::Bounce,
            "ease" => EasingFunction::Ease,
            other => {
                log::debug!("unknown timing function '{other}', using ease");
                EasingFunction::Ease
            }
        }
    }

    /// Name as stored in tile flags.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EasingFunction::Linear => "linear",
            EasingFunction::Ease => "ease",
            EasingFunction::Bounce => "bounce",
        }
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for EasingFunction {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<EasingFunction> for String {
    fn from(easing: EasingFunction) -> Self {
        easing.name().to_owned()
    }
}

fn bounce_out(t: f64) -> f64 {
    let segment = |offset: f64, base: f64| {
        let d = t - offset / BOUNCE_DIVISOR;
        BOUNCE_AMPLITUDE * d * d + base
    };

    if t < 1.0 / BOUNCE_DIVISOR {
        segment(0.0, 0.0)
    } else if t < 2.0 / BOUNCE_DIVISOR {
        segment(1.5, 0.75)
    } else if t < 2.5 / BOUNCE_DIVISOR {
        segment(2.25, 0.9375)
    } else {
        segment(2.625, 0.984_375)
    }
}
