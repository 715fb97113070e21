use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Curve applied to the normalized progress of a timed animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => {
                let t1 = t - 1.0;
                (t1 * t1).mul_add(t1, 1.0)
            }
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let t1 = 2.0f64.mul_add(t, -2.0);
                    (0.5 * t1 * t1).mul_add(t1, 1.0)
                }
            }
        }
    }
}

#[inline]
#[must_use]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    (end - start).mul_add(t, start)
}

pub(super) fn step(
    from: f64,
    to: f64,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
) -> (f64, bool) {
    if duration.is_zero() || elapsed >= duration {
        return (to, true);
    }
    let t = elapsed.as_secs_f64() / duration.as_secs_f64();
    (lerp(from, to, easing.apply(t)), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_both_ends() {
        for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut] {
            assert!(easing.apply(0.0).abs() < 1e-12, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12, "{easing:?}");
        }
    }

    #[test]
    fn ease_out_leads_linear() {
        assert!(Easing::EaseOut.apply(0.3) > Easing::Linear.apply(0.3));
    }

    #[test]
    fn timed_step_lands_exactly_on_target() {
        let duration = Duration::from_millis(150);
        let (mid, done) = step(2.0, 1.0, duration, Easing::Linear, Duration::from_millis(75));
        assert!((mid - 1.5).abs() < 1e-9);
        assert!(!done);

        let (end, done) = step(2.0, 1.0, duration, Easing::Linear, Duration::from_millis(200));
        assert_eq!(end, 1.0);
        assert!(done);
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        assert_eq!(
            step(0.0, 3.0, Duration::ZERO, Easing::EaseOut, Duration::ZERO),
            (3.0, true)
        );
    }
}
