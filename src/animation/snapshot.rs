//! Pre-transition capture of a tile's resting pose.

use glam::DVec2;

use crate::error::PropertyError;
use crate::host::Animatable;

/// A tile's resting pose, taken when a transition starts.
///
/// Entrances interpolate toward it; exits restore it once they finish.
/// Lives exactly as long as the run that captured it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSnapshot {
    /// Configured opacity `O`.
    pub alpha: f64,
    /// Original scale vector, `None` without a scale container.
    pub scale: Option<DVec2>,
    /// Original position.
    pub position: DVec2,
    /// Width and height at capture time.
    pub size: DVec2,
}

impl AnimationSnapshot {
    /// Capture the current pose of `tile`.
    pub fn capture(tile: &dyn Animatable) -> Self {
        Self {
            alpha: tile.base_alpha(),
            scale: tile.scale(),
            position: tile.position(),
            size: tile.size(),
        }
    }

    /// Write the captured pose back to `tile`.
    ///
    /// Every property is attempted; the first failure is returned.
    pub fn restore(
        &self,
        tile: &mut dyn Animatable,
    ) -> Result<(), PropertyError> {
        let alpha = tile.set_alpha(self.alpha);
        let scale = match self.scale {
            Some(scale) => tile.set_scale(scale),
            None => Ok(()),
        };
        let position = tile.set_position(self.position);
        alpha.and(scale).and(position)
    }
}
