use rustc_hash::FxHashSet;

use crate::host::{BusyIndicator, TileId};

/// Tile HUD whose visibility toggle is disabled while its tile animates.
#[derive(Debug, Default)]
pub struct HudIndicator {
    disabled: FxHashSet<TileId>,
}

impl HudIndicator {
    /// HUD with every toggle enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the visibility toggle for `id` is currently disabled.
    #[must_use]
    pub fn is_disabled(&self, id: &TileId) -> bool {
        self.disabled.contains(id)
    }

    /// Number of disabled toggles.
    #[must_use]
    pub fn disabled_count(&self) -> usize {
        self.disabled.len()
    }
}

impl BusyIndicator for HudIndicator {
    fn set_busy(&mut self, id: &TileId, busy: bool) {
        if busy {
            let _ = self.disabled.insert(id.clone());
        } else {
            let _ = self.disabled.remove(id);
        }
    }
}
