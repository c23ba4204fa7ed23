//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks (`time`)
//! - Input events (`input`)

pub mod input;
pub mod time;

pub use input::{InputBuffer, InputEvent, map_key};
pub use time::FrameClock;
