//! Entrance and exit transitions for tiles.
//!
//! A [`coordinator::TransitionCoordinator`] watches visibility refreshes,
//! resolves the tile's [`transition::TransitionKind`] into a
//! [`transition::TransitionPlan`] and drives it frame by frame with a
//! [`tween::Tween`].

pub mod coordinator;
pub mod snapshot;
pub mod transition;
pub mod tween;

pub use coordinator::{RefreshOutcome, TransitionCoordinator};
pub use transition::{Direction, SlideEdge, TransitionKind};
