//! Engine options with TOML preset support, plus the per-tile flag record.
//!
//! [`Options`] holds engine-wide defaults and serializes to/from TOML.
//! [`TileFlags`] is what a host stores on each tile document; it resolves
//! against the defaults into a [`TransitionConfig`] at the moment a
//! transition starts.

mod playback;
mod transition;

use std::path::Path;

pub use playback::PlaybackOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use transition::{
    TileFlags, TransitionConfig, TransitionDefaults, MAX_DURATION_SECS,
    MIN_DURATION_SECS,
};

use crate::error::VeilError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[transitions]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Fallback transition settings for tiles without flags.
    pub transitions: TransitionDefaults,
    /// Frame pacing for hosts driven by [`crate::util::frame_clock`].
    pub playback: PlaybackOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, VeilError> {
        toml::from_str(content)
            .map_err(|e| VeilError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, VeilError> {
        let content = std::fs::read_to_string(path).map_err(VeilError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), VeilError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VeilError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VeilError::Io)?;
        }
        std::fs::write(path, content).map_err(VeilError::Io)
    }
}
