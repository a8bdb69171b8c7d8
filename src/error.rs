//! Crate-level error types.

use std::fmt;

/// Errors produced by the veil crate.
///
/// Frame-loop failures never surface as `VeilError`: the coordinator logs
/// them and finishes the affected run. These errors come from setup paths
/// such as options loading.
#[derive(Debug)]
pub enum VeilError {
    /// The tile is missing, destroyed, or has no render surface.
    InvalidTarget(String),
    /// A property write on a tile was rejected.
    Property(PropertyError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl fmt::Display for VeilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget(id) => write!(f, "invalid target: {id}"),
            Self::Property(e) => write!(f, "property error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for VeilError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Property(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PropertyError> for VeilError {
    fn from(e: PropertyError) -> Self {
        Self::Property(e)
    }
}

impl From<std::io::Error> for VeilError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A tile rejected a property assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// The host refused the write.
    Rejected {
        /// Property name (`alpha`, `scale`, `position`, `visible`).
        property: &'static str,
        /// Host-supplied reason.
        reason: String,
    },
    /// The render surface has no scale container.
    MissingScale,
    /// The render surface is gone.
    NoSurface,
}

impl PropertyError {
    /// Shorthand for [`PropertyError::Rejected`].
    pub fn rejected(property: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            property,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { property, reason } => {
                write!(f, "write to {property} rejected: {reason}")
            }
            Self::MissingScale => f.write_str("render surface has no scale"),
            Self::NoSurface => f.write_str("tile has no render surface"),
        }
    }
}

impl std::error::Error for PropertyError {}
