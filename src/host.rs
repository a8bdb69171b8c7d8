//! Interfaces the transition engine consumes from its host.
//!
//! The host owns every tile. The engine only ever holds a [`TileId`] and
//! looks the tile up again through [`TileRegistry`] on each frame, so a tile
//! destroyed mid-transition is noticed on the next tick instead of being kept
//! alive by the engine.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::PropertyError;
use crate::options::TileFlags;

/// Host-assigned tile identifier.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TileId(String);

impl TileId {
    /// Identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A visual target the engine can animate.
///
/// Getters read the render surface; setters write it and may fail, in which
/// case only the current transition is aborted.
pub trait Animatable {
    /// Whether the host has destroyed this tile.
    fn is_destroyed(&self) -> bool;

    /// Whether the tile currently has a render surface.
    fn has_surface(&self) -> bool;

    /// Live tiles are animatable: not destroyed and with a surface.
    fn is_live(&self) -> bool {
        !self.is_destroyed() && self.has_surface()
    }

    /// Document-level hidden flag (the visibility the user toggled).
    fn is_hidden(&self) -> bool;

    /// Configured opacity `O` from the host document.
    fn base_alpha(&self) -> f64;

    /// Current render-surface opacity.
    fn alpha(&self) -> f64;

    /// Write the render-surface opacity.
    fn set_alpha(&mut self, alpha: f64) -> Result<(), PropertyError>;

    /// Render-surface scale, `None` when the surface has no scale container.
    fn scale(&self) -> Option<DVec2>;

    /// Write the render-surface scale.
    fn set_scale(&mut self, scale: DVec2) -> Result<(), PropertyError>;

    /// Render-surface position.
    fn position(&self) -> DVec2;

    /// Write the render-surface position.
    fn set_position(&mut self, position: DVec2) -> Result<(), PropertyError>;

    /// Width and height of the tile.
    fn size(&self) -> DVec2;

    /// Turn drawing of the render surface on or off.
    fn set_rendered(&mut self, rendered: bool) -> Result<(), PropertyError>;
}

/// Identifier-based lookup into the host's tile storage.
pub trait TileRegistry {
    /// Mutable access to a tile, `None` once the host dropped it.
    fn tile_mut(&mut self, id: &TileId) -> Option<&mut dyn Animatable>;
}

/// Per-tile transition flags, read fresh on every refresh.
pub trait FlagStore {
    /// Flags stored on the tile's document, `None` when it has none.
    fn flags(&self, id: &TileId) -> Option<TileFlags>;
}

/// External "animation in progress" signal, e.g. a HUD toggle that must
/// stay disabled while its tile animates.
pub trait BusyIndicator {
    /// Mark `id` as busy or idle.
    fn set_busy(&mut self, id: &TileId, busy: bool);
}

/// Busy indicator that ignores every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBusyIndicator;

impl BusyIndicator for NoBusyIndicator {
    fn set_busy(&mut self, _id: &TileId, _busy: bool) {}
}

/// Post-action run once an exit transition ends.
///
/// Receives the tile when it is still reachable, `None` when the transition
/// ended because the tile was destroyed or removed.
pub type OnHidden = Box<dyn FnOnce(&TileId, Option<&mut dyn Animatable>)>;

/// Default exit post-action: stop drawing the render surface.
pub fn hide_surface(id: &TileId, tile: Option<&mut dyn Animatable>) {
    let Some(tile) = tile else {
        return;
    };
    if tile.is_destroyed() {
        return;
    }
    if let Err(e) = tile.set_rendered(false) {
        log::warn!("tile {id}: failed to hide surface after exit: {e}");
    }
}
