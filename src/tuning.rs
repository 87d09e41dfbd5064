//! Data-driven game balance
//!
//! Every number the controller acts on lives here so a level can ship its
//! own JSON tuning file. Defaults match `consts`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ball position after reset
    pub spawn_point: Vec3,
    /// Ball height that ends the run
    pub fall_threshold: f32,
    /// Seconds from game over to automatic reset
    pub reset_delay: f32,
    /// Seconds a collected pearl stays hidden
    pub pearl_respawn_delay: f32,
    pub lateral_force_scale: f32,
    pub forward_force_scale: f32,
    pub forward_bias: f32,
    /// Camera follow easing per frame (0 = frozen, 1 = snap)
    pub follow_lerp: f32,
    pub pearl_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_point: SPAWN_POINT,
            fall_threshold: FALL_THRESHOLD,
            reset_delay: RESET_DELAY,
            pearl_respawn_delay: PEARL_RESPAWN_DELAY,
            lateral_force_scale: LATERAL_FORCE_SCALE,
            forward_force_scale: FORWARD_FORCE_SCALE,
            forward_bias: FORWARD_BIAS,
            follow_lerp: FOLLOW_LERP,
            pearl_score: PEARL_SCORE,
        }
    }
}

impl Tuning {
    /// Clamp values that would break the phase machine (negative delays,
    /// follow factors outside [0, 1])
    pub fn sanitized(mut self) -> Self {
        self.reset_delay = self.reset_delay.max(0.0);
        self.pearl_respawn_delay = self.pearl_respawn_delay.max(0.0);
        self.follow_lerp = self.follow_lerp.clamp(0.0, 1.0);
        self
    }
}
