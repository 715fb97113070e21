//! Swipeable question-card stack.
//!
//! [`StackCoordinator`] holds the shared index state, [`GestureController`]
//! turns drags and button presses into pan motion and commit decisions, the
//! renderer maps both onto at most two card transforms, and
//! [`CardStackController`] ties them to the persisted session.

mod config;
mod controller;
mod coordinator;
mod dispatch;
mod gesture;
mod haptics;
mod renderer;

pub use config::StackConfig;
pub use controller::{CardStackController, apply_commits};
pub use coordinator::StackCoordinator;
pub use dispatch::{MainHandle, MainQueue, StackEvent};
pub use gesture::{GestureController, GestureOutcome, GesturePhase};
pub use haptics::{Haptics, ImpactStyle, NoopHaptics, RecordingHaptics};
pub use renderer::{
    AnimationSnapshot, CardFrame, CardRole, CardTransform, StackFrame, card_style,
    next_card_opacity, render_frame, rotation, visible_window,
};
