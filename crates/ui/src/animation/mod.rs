//! Frame-driven animated values.
//!
//! A [`SharedValue`] is written by one producer (a gesture callback or a
//! running animation) and observed by any number of readers without going
//! through the component tree. [`FrameDriver`] advances every animation of a
//! stack once per frame.

mod driver;
mod shared_value;
mod spring;
mod timing;

pub use driver::FrameDriver;
pub use shared_value::{CompletionCallback, SharedValue, SubscriptionId};
pub use spring::SpringConfig;
pub use timing::{Easing, lerp};

use std::time::Duration;

/// Target and curve of an animation started on a [`SharedValue<f64>`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    Timing {
        to: f64,
        duration: Duration,
        easing: Easing,
    },
    Spring {
        to: f64,
        config: SpringConfig,
    },
}

impl Animation {
    #[must_use]
    pub fn timing(to: f64, duration: Duration, easing: Easing) -> Self {
        Animation::Timing {
            to,
            duration,
            easing,
        }
    }

    #[must_use]
    pub fn spring(to: f64, config: SpringConfig) -> Self {
        Animation::Spring { to, config }
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        match self {
            Animation::Timing { to, .. } | Animation::Spring { to, .. } => *to,
        }
    }
}

/// An animation in progress: where it started and how far it has run.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActiveAnimation {
    animation: Animation,
    from: f64,
    elapsed: Duration,
    velocity: f64,
}

impl ActiveAnimation {
    pub(crate) fn new(animation: Animation, from: f64) -> Self {
        Self {
            animation,
            from,
            elapsed: Duration::ZERO,
            velocity: 0.0,
        }
    }

    /// Advance by `dt` from `current`. Returns the new value and whether the
    /// animation reached its target.
    pub(crate) fn step(&mut self, current: f64, dt: Duration) -> (f64, bool) {
        self.elapsed += dt;
        match self.animation {
            Animation::Timing {
                to,
                duration,
                easing,
            } => timing::step(self.from, to, duration, easing, self.elapsed),
            Animation::Spring { to, config } => {
                let (value, velocity, settled) = config.step(current, self.velocity, to, dt);
                self.velocity = velocity;
                (value, settled)
            }
        }
    }
}
