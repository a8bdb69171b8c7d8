//! In-memory reference host: tile storage, flags and a HUD busy indicator.
//!
//! Real hosts implement [`TileRegistry`], [`FlagStore`] and
//! [`BusyIndicator`](crate::host::BusyIndicator) over their own scene graph.
//! [`Scene`] does the same over a flat map and backs the demo binary and the
//! test suite.

mod hud;
mod tile;

pub use hud::HudIndicator;
use glam::DVec2;
use rustc_hash::FxHashMap;
pub use tile::{Mesh, Tile};

use crate::error::VeilError;
use crate::host::{Animatable, FlagStore, TileId, TileRegistry};
use crate::options::TileFlags;

/// Flat tile storage keyed by [`TileId`], iterated in insertion order.
#[derive(Debug, Default)]
pub struct Scene {
    tiles: FxHashMap<TileId, Tile>,
    /// Insertion order for deterministic iteration.
    order: Vec<TileId>,
}

impl Scene {
    /// Empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile, replacing any tile with the same id.
    pub fn insert(&mut self, tile: Tile) -> Option<Tile> {
        let id = tile.id().clone();
        let previous = self.tiles.insert(id.clone(), tile);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    /// Remove a tile entirely (the host dropped it).
    pub fn remove(&mut self, id: &TileId) -> Option<Tile> {
        self.order.retain(|existing| existing != id);
        self.tiles.remove(id)
    }

    /// Shared access to a tile.
    #[must_use]
    pub fn get(&self, id: &TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    /// Mutable access to a tile.
    pub fn get_mut(&mut self, id: &TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id)
    }

    /// Set a tile's document visibility and redraw its surface to match.
    /// Returns `false` if unknown.
    pub fn set_hidden(&mut self, id: &TileId, hidden: bool) -> bool {
        self.tiles.get_mut(id).is_some_and(|tile| {
            tile.set_hidden(hidden);
            true
        })
    }

    /// Destroy a tile in place, keeping it addressable.
    pub fn destroy(&mut self, id: &TileId) -> bool {
        self.tiles.get_mut(id).is_some_and(|tile| {
            tile.destroy();
            true
        })
    }

    /// Flip a live tile's document visibility. Returns the new hidden flag.
    pub fn toggle_hidden(&mut self, id: &TileId) -> Result<bool, VeilError> {
        let tile = self.live_tile(id)?;
        let hidden = !tile.hidden;
        tile.set_hidden(hidden);
        Ok(hidden)
    }

    /// Move a live tile's render surface.
    pub fn place(
        &mut self,
        id: &TileId,
        position: DVec2,
    ) -> Result<(), VeilError> {
        self.live_tile(id)?.set_position(position)?;
        Ok(())
    }

    fn live_tile(&mut self, id: &TileId) -> Result<&mut Tile, VeilError> {
        self.tiles
            .get_mut(id)
            .filter(|tile| tile.is_live())
            .ok_or_else(|| VeilError::InvalidTarget(id.to_string()))
    }

    /// Tile ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &TileId> {
        self.order.iter()
    }

    /// Tiles in insertion order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.order.iter().filter_map(|id| self.tiles.get(id))
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the scene has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl TileRegistry for Scene {
    fn tile_mut(&mut self, id: &TileId) -> Option<&mut dyn Animatable> {
        let tile = self.tiles.get_mut(id)?;
        Some(tile)
    }
}

impl FlagStore for Scene {
    fn flags(&self, id: &TileId) -> Option<TileFlags> {
        self.tiles.get(id)?.flags.clone()
    }
}
