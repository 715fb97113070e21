use std::sync::{Mutex, PoisonError};

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
}

/// Platform haptic pulse.
///
/// Called from the gesture path; implementations must return immediately and
/// never report failure.
pub trait Haptics: Send + Sync {
    fn impact(&self, style: ImpactStyle);
}

/// For platforms without a haptic engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHaptics;

impl Haptics for NoopHaptics {
    fn impact(&self, style: ImpactStyle) {
        trace!(?style, "haptic impact");
    }
}

/// Keeps every pulse it receives.
#[derive(Debug, Default)]
pub struct RecordingHaptics {
    impacts: Mutex<Vec<ImpactStyle>>,
}

impl RecordingHaptics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn impacts(&self) -> Vec<ImpactStyle> {
        self.impacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Haptics for RecordingHaptics {
    fn impact(&self, style: ImpactStyle) {
        self.impacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(style);
    }
}
