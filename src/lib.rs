//! Marble Sky - A tilt-controlled marble rolling game
//!
//! Core modules:
//! - `sim`: Game controller, phase machine, contact dispatch, scheduling
//! - `platform`: Headless in-memory host (scene, motion sources)
//! - `audio`: Sound cue registry and playback
//! - `persistence`: JSON load/save for settings, tuning and high scores
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioCuePlayer, AudioManager, SoundCue};
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep used by the headless host (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Where the ball is placed on reset, above the start of the track
    pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 10.0, 0.0);
    /// Ball height below which the run is over
    pub const FALL_THRESHOLD: f32 = -5.0;
    /// Seconds between game over and the automatic reset
    pub const RESET_DELAY: f32 = 5.0;
    /// Seconds a collected pearl stays hidden
    pub const PEARL_RESPAWN_DELAY: f32 = 30.0;

    /// Seconds between motion samples
    pub const MOTION_INTERVAL: f32 = 0.1;
    /// Lateral tilt to force scale
    pub const LATERAL_FORCE_SCALE: f32 = 0.05;
    /// Forward tilt to force scale (negative: tilting toward you rolls forward)
    pub const FORWARD_FORCE_SCALE: f32 = -0.05;
    /// Resting forward tilt of a hand-held device, cancelled out
    pub const FORWARD_BIAS: f32 = 0.8;

    /// Fraction of the gap the camera follow anchor closes each frame
    pub const FOLLOW_LERP: f32 = 0.01;

    /// Points per pearl
    pub const PEARL_SCORE: u64 = 1;
}

/// Scene node names the controller binds to at startup
pub mod names {
    pub const BALL: &str = "ball";
    pub const CAMERA: &str = "camera";
    pub const CAMERA_FOLLOW: &str = "follow_camera";
    pub const LIGHT_FOLLOW: &str = "follow_light";
}

/// Move `from` toward `to` by `factor` of the gap on every axis
#[inline]
pub fn lerp_toward(from: Vec3, to: Vec3, factor: f32) -> Vec3 {
    from + (to - from) * factor
}
