// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Entrance and exit transitions for 2D tiles.
//!
//! Veil animates a tile when its visibility flips: fades, zooms and edge
//! slides with configurable duration, intensity and easing. The host owns
//! every tile and drives the engine one frame at a time.
//!
//! # Key entry points
//!
//! - [`animation::TransitionCoordinator`] - per-tile state machine; feed it
//!   visibility refreshes and destruction events, then call
//!   [`tick`](animation::TransitionCoordinator::tick) once per frame
//! - [`host`] - traits a host implements to expose its tiles
//! - [`options::Options`] - engine defaults (TOML presets, JSON schema)
//! - [`options::TileFlags`] - per-tile transition flags
//! - [`scene`] - in-memory reference host used by the demo and tests
//!
//! # Frame model
//!
//! Everything runs on the host's frame thread. A refresh that starts a run
//! writes the start pose synchronously; each
//! [`tick`](animation::TransitionCoordinator::tick) re-looks-up the tile by
//! id, writes every channel for that frame and completes runs whose progress
//! reached 1 or whose tile disappeared.

pub mod animation;
pub mod error;
pub mod host;
pub mod options;
pub mod scene;
pub mod util;
