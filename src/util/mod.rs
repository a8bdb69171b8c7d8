//! Shared utilities: easing curves and the frame clock.

pub mod easing;
pub mod frame_clock;
