use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Frame pacing for hosts that let veil drive their frame loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Playback", inline)]
#[serde(default)]
pub struct PlaybackOptions {
    /// Target frames per second (0 = unlimited; fixed clocks step at 60).
    #[schemars(title = "Frame Rate", range(min = 0, max = 240))]
    pub fps: u32,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self { fps: 60 }
    }
}
