use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::SpringConfig;

/// Tuning of the card stack for one viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Fraction of the viewport width a drag must exceed to commit.
    pub pan_ratio: f64,
    pub fly_out_ms: u64,
    pub snap_ms: u64,
    pub cancel_spring: SpringConfig,
    pub max_rotation_deg: f64,
    /// Downward offset of the card waiting behind the top card, in pixels.
    pub stack_offset_y: f64,
    pub stack_scale: f64,
}

impl StackConfig {
    #[must_use]
    pub fn for_viewport(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
            ..Self::default()
        }
    }

    /// Horizontal distance that separates a commit from a cancel.
    #[must_use]
    pub fn pan_distance(&self) -> f64 {
        self.viewport_width * self.pan_ratio
    }

    /// Drag distance at which rotation reaches `max_rotation_deg`.
    #[must_use]
    pub fn rotation_distance(&self) -> f64 {
        self.pan_distance() * 2.0
    }

    /// Horizontal travel of a card leaving the screen.
    #[must_use]
    pub fn fly_out_distance(&self) -> f64 {
        self.viewport_width
    }

    #[must_use]
    pub fn fly_out_duration(&self) -> Duration {
        Duration::from_millis(self.fly_out_ms)
    }

    #[must_use]
    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap_ms)
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            viewport_width: 400.0,
            viewport_height: 800.0,
            pan_ratio: 0.25,
            fly_out_ms: 300,
            snap_ms: 150,
            cancel_spring: SpringConfig::CANCEL,
            max_rotation_deg: 8.0,
            stack_offset_y: 12.0,
            stack_scale: 0.95,
        }
    }
}
