//! Platform abstraction layer
//!
//! Handles the boundary between the simulation and its host:
//! - Input: paddle handoff from the pointer-handling thread
//! - Time: measured or fixed frame times

pub mod input;
pub mod time;

pub use input::SharedPaddle;
pub use time::FrameClock;
