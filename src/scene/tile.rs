use glam::DVec2;

use crate::error::PropertyError;
use crate::host::{Animatable, TileId};
use crate::options::TileFlags;

/// Render surface of a tile: what actually gets drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Surface position.
    pub position: DVec2,
    /// Surface scale, `None` when the surface has no scale container.
    pub scale: Option<DVec2>,
    /// Surface opacity.
    pub alpha: f64,
    /// Whether the surface is drawn.
    pub visible: bool,
    /// Rejects every write while set (e.g. surface locked by the host).
    pub frozen: bool,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            scale: Some(DVec2::ONE),
            alpha: 1.0,
            visible: true,
            frozen: false,
        }
    }
}

impl Mesh {
    fn writable(
        &mut self,
        property: &'static str,
    ) -> Result<&mut Self, PropertyError> {
        if self.frozen {
            return Err(PropertyError::rejected(property, "surface is frozen"));
        }
        Ok(self)
    }
}

/// A tile document plus its render surface.
#[derive(Debug, Clone)]
pub struct Tile {
    id: TileId,
    /// Document-level hidden flag.
    pub hidden: bool,
    /// Configured opacity.
    pub alpha: f64,
    /// Width and height.
    pub size: DVec2,
    /// Transition flags stored on the document.
    pub flags: Option<TileFlags>,
    /// Render surface, `None` before the host draws the tile.
    pub mesh: Option<Mesh>,
    destroyed: bool,
}

impl Tile {
    /// Visible, fully opaque tile of the given size with a default surface.
    pub fn new(id: impl Into<TileId>, size: DVec2) -> Self {
        Self {
            id: id.into(),
            hidden: false,
            alpha: 1.0,
            size,
            flags: None,
            mesh: Some(Mesh::default()),
            destroyed: false,
        }
    }

    /// Attach transition flags.
    #[must_use]
    pub fn with_flags(mut self, flags: TileFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    /// Place the surface at `position`.
    #[must_use]
    pub fn at(mut self, position: DVec2) -> Self {
        if let Some(mesh) = self.mesh.as_mut() {
            mesh.position = position;
        }
        self
    }

    /// Tile identifier.
    #[must_use]
    pub fn id(&self) -> &TileId {
        &self.id
    }

    /// Set the document hidden flag and redraw the surface to match, the
    /// way a host recomputes surface visibility on every refresh.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        if let Some(mesh) = self.mesh.as_mut() {
            mesh.visible = !hidden;
        }
    }

    /// Tear the tile down: the surface is released and writes start failing.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.mesh = None;
    }

    fn mesh_mut(&mut self) -> Result<&mut Mesh, PropertyError> {
        if self.destroyed {
            return Err(PropertyError::NoSurface);
        }
        self.mesh.as_mut().ok_or(PropertyError::NoSurface)
    }
}

impl From<&str> for Tile {
    fn from(id: &str) -> Self {
        Self::new(id, DVec2::new(100.0, 100.0))
    }
}

impl Animatable for Tile {
    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn has_surface(&self) -> bool {
        self.mesh.is_some()
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn base_alpha(&self) -> f64 {
        self.alpha
    }

    fn alpha(&self) -> f64 {
        self.mesh.as_ref().map_or(0.0, |m| m.alpha)
    }

    fn set_alpha(&mut self, alpha: f64) -> Result<(), PropertyError> {
        self.mesh_mut()?.writable("alpha")?.alpha = alpha;
        Ok(())
    }

    fn scale(&self) -> Option<DVec2> {
        self.mesh.as_ref().and_then(|m| m.scale)
    }

    fn set_scale(&mut self, scale: DVec2) -> Result<(), PropertyError> {
        let mesh = self.mesh_mut()?.writable("scale")?;
        let slot = mesh.scale.as_mut().ok_or(PropertyError::MissingScale)?;
        *slot = scale;
        Ok(())
    }

    fn position(&self) -> DVec2 {
        self.mesh.as_ref().map_or(DVec2::ZERO, |m| m.position)
    }

    fn set_position(&mut self, position: DVec2) -> Result<(), PropertyError> {
        self.mesh_mut()?.writable("position")?.position = position;
        Ok(())
    }

    fn size(&self) -> DVec2 {
        self.size
    }

    fn set_rendered(&mut self, rendered: bool) -> Result<(), PropertyError> {
        self.mesh_mut()?.writable("visible")?.visible = rendered;
        Ok(())
    }
}
