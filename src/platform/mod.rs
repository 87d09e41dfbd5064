//! Platform abstraction layer
//!
//! Headless stand-ins for what a device and engine provide:
//! - `MemoryScene`: scene graph plus a tiny physics world
//! - `FixedTilt` / `WobbleTilt`: accelerometer readings
//!
//! Audio lives in `crate::audio`.

pub mod motion;
pub mod scene;

pub use motion::{FixedTilt, WobbleTilt};
pub use scene::{Body, MemoryScene, Track};
