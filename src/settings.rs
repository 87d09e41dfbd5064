//! Game settings and preferences
//!
//! Persisted separately from high scores, as JSON next to the executable
//! or wherever the host points `persistence` at.

use serde::{Deserialize, Serialize};

use crate::consts::MOTION_INTERVAL;

/// Shortest motion sampling interval accepted (seconds)
pub const MIN_MOTION_INTERVAL: f32 = 1.0 / 120.0;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Controls ===
    /// Seconds between tilt samples
    pub motion_interval: f32,
    /// Multiplier applied on top of the tuned tilt-to-force scales
    pub tilt_sensitivity: f32,
    /// Flip the forward axis (device held upside down)
    pub invert_forward: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all cues
    pub muted: bool,

    // === HUD ===
    /// Show the best score next to the run score
    pub show_best_score: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            motion_interval: MOTION_INTERVAL,
            tilt_sensitivity: 1.0,
            invert_forward: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            show_best_score: true,
        }
    }
}

impl Settings {
    /// Sampling interval, never faster than `MIN_MOTION_INTERVAL`
    pub fn effective_motion_interval(&self) -> f32 {
        if self.motion_interval.is_finite() {
            self.motion_interval.max(MIN_MOTION_INTERVAL)
        } else {
            MOTION_INTERVAL
        }
    }

    /// Volume actually applied to cues
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Signed sensitivity for the forward axis
    pub fn forward_sensitivity(&self) -> f32 {
        if self.invert_forward {
            -self.tilt_sensitivity
        } else {
            self.tilt_sensitivity
        }
    }
}
