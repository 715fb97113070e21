use std::time::Duration;

use super::SharedValue;

/// Advances a fixed set of animated values once per frame.
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    values: Vec<SharedValue<f64>>,
}

impl FrameDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, value: SharedValue<f64>) {
        self.values.push(value);
    }

    /// Step every running animation by `dt`. Returns whether any is still running.
    ///
    /// Values are stepped in the order they were tracked; a completion
    /// callback that starts a new animation on a later value is picked up in
    /// the same frame.
    pub fn tick(&self, dt: Duration) -> bool {
        let mut running = false;
        for value in &self.values {
            running |= value.tick(dt);
        }
        running
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.values.iter().any(SharedValue::is_animating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animation, Easing};

    #[test]
    fn ticks_every_tracked_value() {
        let a = SharedValue::new(0.0);
        let b = SharedValue::new(1.0);
        let mut driver = FrameDriver::new();
        driver.track(a.clone());
        driver.track(b.clone());

        a.animate(
            Animation::timing(1.0, Duration::from_millis(32), Easing::Linear),
            None,
        );
        b.animate(
            Animation::timing(0.0, Duration::from_millis(16), Easing::Linear),
            None,
        );

        assert!(driver.tick(Duration::from_millis(16)));
        assert_eq!(b.get(), 0.0);
        assert!(!driver.tick(Duration::from_millis(16)));
        assert_eq!(a.get(), 1.0);
        assert!(!driver.is_animating());
    }
}
