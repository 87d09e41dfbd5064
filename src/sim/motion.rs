//! Tilt input
//!
//! The device reports accelerometer-style samples; only x (left/right) and
//! y (toward/away) matter. A sample is turned into a small velocity nudge
//! that the controller adds to the ball every frame until the next sample.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::tuning::Tuning;

/// One accelerometer reading, in g
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TiltSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl TiltSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Periodic tilt readings provided by the host
pub trait MotionSource {
    /// Latest reading, None if the sensor has nothing yet
    fn sample(&mut self) -> Option<TiltSample>;
}

impl<M: MotionSource + ?Sized> MotionSource for Box<M> {
    fn sample(&mut self) -> Option<TiltSample> {
        (**self).sample()
    }
}

/// Convert a tilt reading into the per-frame velocity nudge
pub fn tilt_to_force(sample: TiltSample, tuning: &Tuning, settings: &Settings) -> Vec3 {
    Vec3::new(
        sample.x * tuning.lateral_force_scale * settings.tilt_sensitivity,
        0.0,
        (sample.y + tuning.forward_bias) * tuning.forward_force_scale * settings.forward_sensitivity(),
    )
}

/// Polls a motion source at a fixed cadence of simulated time and holds the
/// force from the most recent reading
#[derive(Debug, Clone)]
pub struct MotionSampler {
    interval: f32,
    elapsed: f32,
    force: Vec3,
}

impl MotionSampler {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
            force: Vec3::ZERO,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Force from the last reading
    pub fn force(&self) -> Vec3 {
        self.force
    }

    /// Forget the last reading and restart the cadence
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.force = Vec3::ZERO;
    }

    /// Advance by `dt`; when an interval has passed, poll `source` and
    /// overwrite the held force. Returns the force to apply this frame.
    pub fn update<M: MotionSource + ?Sized>(
        &mut self,
        dt: f32,
        source: &mut M,
        tuning: &Tuning,
        settings: &Settings,
    ) -> Vec3 {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            // One poll per frame at most; long frames don't queue catch-up polls
            self.elapsed %= self.interval;
            if let Some(sample) = source.sample() {
                self.force = tilt_to_force(sample, tuning, settings);
            }
        }
        self.force
    }
}
