//! Last-seen visibility per tile, used to turn refreshes into edges.

use rustc_hash::FxHashMap;

use crate::animation::transition::Direction;
use crate::host::TileId;

/// What a refresh reported relative to the previous observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityChange {
    /// Tile never seen before; its state is recorded, nothing animates.
    FirstObservation,
    /// Same visibility as last time.
    Unchanged,
    /// Was hidden, now visible.
    Appeared,
    /// Was visible, now hidden.
    Disappeared,
}

impl VisibilityChange {
    /// Transition direction for an edge, `None` otherwise.
    #[must_use]
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Appeared => Some(Direction::Entering),
            Self::Disappeared => Some(Direction::Exiting),
            Self::FirstObservation | Self::Unchanged => None,
        }
    }
}

/// Visibility record keyed by tile.
#[derive(Debug, Default)]
pub struct VisibilityTracker {
    last_seen: FxHashMap<TileId, bool>,
}

impl VisibilityTracker {
    /// Empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `visible` for `id` and classify it against the previous value.
    pub fn observe(&mut self, id: &TileId, visible: bool) -> VisibilityChange {
        match self.last_seen.insert(id.clone(), visible) {
            None => VisibilityChange::FirstObservation,
            Some(previous) if previous == visible => {
                VisibilityChange::Unchanged
            }
            Some(_) if visible => VisibilityChange::Appeared,
            Some(_) => VisibilityChange::Disappeared,
        }
    }

    /// Drop the record for `id`. The next observation counts as the first.
    pub fn forget(&mut self, id: &TileId) -> Option<bool> {
        self.last_seen.remove(id)
    }

    /// Last recorded visibility.
    #[must_use]
    pub fn last_seen(&self, id: &TileId) -> Option<bool> {
        self.last_seen.get(id).copied()
    }

    /// Number of tracked tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    /// Whether no tile is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
