//! Tilt sources for running without a device

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{MotionSource, TiltSample};

/// Gravity component along the device's z axis when held at rest
const RESTING_Z: f32 = -0.6;

/// Always reports the same reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTilt {
    pub reading: TiltSample,
}

impl FixedTilt {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            reading: TiltSample::new(x, y, RESTING_Z),
        }
    }

    /// Held at the resting angle: produces no force
    pub fn level() -> Self {
        Self::new(0.0, -crate::consts::FORWARD_BIAS)
    }

    pub fn set(&mut self, x: f32, y: f32) {
        self.reading.x = x;
        self.reading.y = y;
    }
}

impl MotionSource for FixedTilt {
    fn sample(&mut self) -> Option<TiltSample> {
        Some(self.reading)
    }
}

/// A shaky hand: a seeded random walk around a base tilt
#[derive(Debug, Clone)]
pub struct WobbleTilt {
    rng: Pcg32,
    base: TiltSample,
    current: TiltSample,
    /// Largest change per reading on each axis
    pub step: f32,
    /// Pull back toward the base each reading (0 = none, 1 = snap)
    pub spring: f32,
}

impl WobbleTilt {
    pub fn new(seed: u64, base_x: f32, base_y: f32) -> Self {
        let base = TiltSample::new(base_x, base_y, RESTING_Z);
        Self {
            rng: Pcg32::seed_from_u64(seed),
            base,
            current: base,
            step: 0.08,
            spring: 0.05,
        }
    }
}

impl MotionSource for WobbleTilt {
    fn sample(&mut self) -> Option<TiltSample> {
        let dx = self.rng.random_range(-self.step..=self.step);
        let dy = self.rng.random_range(-self.step..=self.step);

        let x = self.current.x + dx + (self.base.x - self.current.x) * self.spring;
        let y = self.current.y + dy + (self.base.y - self.current.y) * self.spring;
        self.current.x = x.clamp(-1.0, 1.0);
        self.current.y = y.clamp(-1.0, 1.0);

        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wobble_is_deterministic() {
        let mut a = WobbleTilt::new(7, 0.0, -0.5);
        let mut b = WobbleTilt::new(7, 0.0, -0.5);
        for _ in 0..50 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_wobble_stays_in_range() {
        let mut tilt = WobbleTilt::new(1, 0.9, 0.9);
        tilt.step = 0.5;
        for _ in 0..500 {
            let s = tilt.sample().unwrap();
            assert!((-1.0..=1.0).contains(&s.x));
            assert!((-1.0..=1.0).contains(&s.y));
        }
    }
}
