use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest integration step; larger frame deltas are split.
const MAX_STEP_SECS: f64 = 1.0 / 1000.0;

/// Damped spring toward a target value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub damping: f64,
    pub stiffness: f64,
    pub mass: f64,
    /// Distance and speed below which the spring snaps to its target.
    pub rest_threshold: f64,
}

impl SpringConfig {
    /// Profile used when a card springs back after a cancelled drag.
    pub const CANCEL: Self = Self {
        damping: 20.0,
        stiffness: 180.0,
        mass: 1.0,
        rest_threshold: 0.01,
    };

    /// Integrate `dt` worth of motion with semi-implicit Euler.
    ///
    /// Returns the new position and velocity, and whether the spring settled.
    pub(super) fn step(
        &self,
        position: f64,
        velocity: f64,
        target: f64,
        dt: Duration,
    ) -> (f64, f64, bool) {
        let mass = if self.mass > 0.0 { self.mass } else { 1.0 };
        let mut x = position;
        let mut v = velocity;
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP_SECS);
            let force = -self.stiffness * (x - target) - self.damping * v;
            v += force / mass * h;
            x += v * h;
            remaining -= h;
        }

        if (x - target).abs() < self.rest_threshold && v.abs() < self.rest_threshold {
            (target, 0.0, true)
        } else {
            (x, v, false)
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::CANCEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(config: SpringConfig, from: f64, to: f64) -> (f64, Duration, f64) {
        let frame = Duration::from_millis(16);
        let mut x = from;
        let mut v = 0.0;
        let mut elapsed = Duration::ZERO;
        let mut overshoot: f64 = 0.0;
        loop {
            let (nx, nv, done) = config.step(x, v, to, frame);
            x = nx;
            v = nv;
            elapsed += frame;
            overshoot = overshoot.max((to - x) * (from - to).signum());
            if done || elapsed > Duration::from_secs(10) {
                return (x, elapsed, overshoot);
            }
        }
    }

    #[test]
    fn cancel_spring_returns_to_rest() {
        let (x, elapsed, _) = settle(SpringConfig::CANCEL, 80.0, 0.0);
        assert_eq!(x, 0.0);
        assert!(elapsed < Duration::from_secs(3), "settled after {elapsed:?}");
    }

    #[test]
    fn cancel_spring_is_underdamped() {
        let (_, _, overshoot) = settle(SpringConfig::CANCEL, 80.0, 0.0);
        assert!(overshoot > 0.0);
    }

    #[test]
    fn zero_dt_does_not_move() {
        let (x, v, done) = SpringConfig::CANCEL.step(10.0, 0.0, 0.0, Duration::ZERO);
        assert_eq!((x, v, done), (10.0, 0.0, false));
    }
}
