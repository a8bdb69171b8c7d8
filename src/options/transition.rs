use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::transition::TransitionKind;
use crate::util::easing::EasingFunction;

/// Shortest allowed transition, in seconds.
pub const MIN_DURATION_SECS: f64 = 0.1;
/// Longest allowed transition, in seconds.
pub const MAX_DURATION_SECS: f64 = 5.0;

/// Engine-wide fallbacks for tiles whose flags leave a field unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Transitions", inline)]
#[serde(default)]
pub struct TransitionDefaults {
    /// Master switch. When off, no refresh starts a transition.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Transition used when a tile has no `transitionType` flag.
    #[schemars(title = "Type", with = "String")]
    pub kind: TransitionKind,
    /// Duration in seconds.
    #[schemars(
        title = "Duration (seconds)",
        range(min = 0.1, max = 5.0),
        extend("step" = 0.1)
    )]
    pub duration_secs: f64,
    /// Movement intensity in percent of the tile size.
    #[schemars(
        title = "Movement Intensity",
        range(min = 0, max = 100),
        extend("step" = 1)
    )]
    pub intensity_percent: u8,
    /// Timing function for the movement channel.
    #[schemars(title = "Timing Function", with = "String")]
    pub easing: EasingFunction,
}

impl Default for TransitionDefaults {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: TransitionKind::None,
            duration_secs: 1.0,
            intensity_percent: 10,
            easing: EasingFunction::Ease,
        }
    }
}

/// Raw transition flags as a host stores them on a tile document.
///
/// Every field is optional; [`TileFlags::resolve`] fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TileFlags {
    /// Transition name, e.g. `"zoom_in_out"`.
    pub transition_type: Option<String>,
    /// Duration in seconds.
    pub transition_duration: Option<f64>,
    /// Movement intensity, 0–100 percent.
    pub movement_intensity: Option<f64>,
    /// Timing function name: `ease`, `linear` or `bounce`.
    pub timing_function: Option<String>,
}

impl TileFlags {
    /// Flags selecting `kind`, leaving everything else to the defaults.
    #[must_use]
    pub fn with_kind(kind: TransitionKind) -> Self {
        Self {
            transition_type: Some(kind.name().to_owned()),
            ..Self::default()
        }
    }

    /// Parse flags from the JSON object a host document carries.
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Resolve into a concrete configuration.
    ///
    /// Unknown names fail closed (`none` transition, `ease` timing), duration
    /// is clamped to [`MIN_DURATION_SECS`]..=[`MAX_DURATION_SECS`] and
    /// intensity to 0–100 percent.
    #[must_use]
    pub fn resolve(&self, defaults: &TransitionDefaults) -> TransitionConfig {
        let kind = self
            .transition_type
            .as_deref()
            .map_or(defaults.kind, TransitionKind::from_name);

        let duration_secs = self
            .transition_duration
            .filter(|d| d.is_finite())
            .unwrap_or(defaults.duration_secs);

        let intensity_percent = self
            .movement_intensity
            .filter(|p| p.is_finite())
            .unwrap_or_else(|| f64::from(defaults.intensity_percent));

        let easing = self
            .timing_function
            .as_deref()
            .map_or(defaults.easing, EasingFunction::from_name);

        TransitionConfig::new(kind, duration_secs, intensity_percent, easing)
    }
}

/// Fully resolved transition settings for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionConfig {
    /// Transition shape.
    pub kind: TransitionKind,
    /// Run length.
    pub duration: Duration,
    /// Movement intensity as a fraction, 0.0–1.0.
    pub intensity: f64,
    /// Timing function for the movement channel.
    pub easing: EasingFunction,
}

impl TransitionConfig {
    /// Build a config, clamping duration (seconds) and intensity (percent).
    #[must_use]
    pub fn new(
        kind: TransitionKind,
        duration_secs: f64,
        intensity_percent: f64,
        easing: EasingFunction,
    ) -> Self {
        let duration_secs = if duration_secs.is_finite() {
            duration_secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS)
        } else {
            TransitionDefaults::default().duration_secs
        };
        let intensity_percent = if intensity_percent.is_finite() {
            intensity_percent.clamp(0.0, 100.0)
        } else {
            f64::from(TransitionDefaults::default().intensity_percent)
        };

        Self {
            kind,
            duration: Duration::from_secs_f64(duration_secs),
            intensity: intensity_percent / 100.0,
            easing,
        }
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        TileFlags::default().resolve(&TransitionDefaults::default())
    }
}
