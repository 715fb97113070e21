use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use convo_core::model::SwipeDirection;
use tracing::debug;

use crate::animation::{Animation, Easing, FrameDriver, SharedValue};

use super::config::StackConfig;
use super::coordinator::StackCoordinator;
use super::dispatch::{MainHandle, StackEvent};
use super::haptics::{Haptics, ImpactStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
    /// The gesture began while a card was still flying out; its moves and
    /// release are dropped.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Commit(SwipeDirection),
    Cancel,
    Ignored,
}

/// Turns one drag (or one button press) into pan updates and a commit or
/// cancel decision.
///
/// Commits are handed to the main queue; nothing here touches the session.
/// While a committed card is flying out, new gestures and button commits are
/// refused.
pub struct GestureController {
    config: StackConfig,
    pan_x: SharedValue<f64>,
    pan_y: SharedValue<f64>,
    anchor_y: SharedValue<f64>,
    phase: GesturePhase,
    threshold_haptic_fired: bool,
    in_flight: Arc<AtomicBool>,
    haptics: Arc<dyn Haptics>,
    main: MainHandle,
}

impl GestureController {
    #[must_use]
    pub fn new(config: StackConfig, haptics: Arc<dyn Haptics>, main: MainHandle) -> Self {
        Self {
            config,
            pan_x: SharedValue::new(0.0),
            pan_y: SharedValue::new(0.0),
            anchor_y: SharedValue::new(0.0),
            phase: GesturePhase::Idle,
            threshold_haptic_fired: false,
            in_flight: Arc::new(AtomicBool::new(false)),
            haptics,
            main,
        }
    }

    /// Register the animated values with the frame driver.
    pub fn attach(&self, driver: &mut FrameDriver) {
        driver.track(self.pan_x.clone());
        driver.track(self.pan_y.clone());
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[must_use]
    pub fn pan_x(&self) -> f64 {
        self.pan_x.get()
    }

    #[must_use]
    pub fn pan_y(&self) -> f64 {
        self.pan_y.get()
    }

    #[must_use]
    pub fn anchor_y(&self) -> f64 {
        self.anchor_y.get()
    }

    /// A committed card is still leaving the screen.
    #[must_use]
    pub fn is_flying_out(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Start a drag at vertical position `touch_y`. Returns whether the
    /// gesture was accepted.
    pub fn begin(&mut self, coordinator: &StackCoordinator, touch_y: f64) -> bool {
        if self.is_flying_out() || coordinator.is_exhausted() {
            debug!(flying_out = self.is_flying_out(), "gesture rejected");
            self.phase = GesturePhase::Rejected;
            return false;
        }

        // Grabbing a card that is still springing back stops the spring.
        self.pan_x.set(self.pan_x.get());
        self.pan_y.set(self.pan_y.get());

        self.phase = GesturePhase::Dragging;
        self.threshold_haptic_fired = false;
        self.anchor_y.set(touch_y);
        coordinator.set_dragging(true);
        true
    }

    /// Follow the raw translation of the drag.
    pub fn change(&mut self, coordinator: &StackCoordinator, dx: f64, dy: f64) {
        if self.phase != GesturePhase::Dragging {
            return;
        }
        self.pan_x.set(dx);
        self.pan_y.set(dy);

        let pan_distance = self.config.pan_distance();
        let progress = if pan_distance > 0.0 {
            dx.abs() / pan_distance
        } else {
            0.0
        };
        coordinator.update_progress(progress);

        if !self.threshold_haptic_fired && dx.abs() > pan_distance {
            self.threshold_haptic_fired = true;
            self.haptics.impact(ImpactStyle::Light);
        }
    }

    /// Release the drag. Past the threshold (strictly) the card commits in
    /// the direction of travel; otherwise it springs back.
    pub fn end(&mut self, coordinator: &StackCoordinator) -> GestureOutcome {
        let phase = std::mem::replace(&mut self.phase, GesturePhase::Idle);
        if phase != GesturePhase::Dragging {
            return GestureOutcome::Ignored;
        }
        coordinator.set_dragging(false);

        let dx = self.pan_x.get();
        let direction = SwipeDirection::from_offset(dx);
        match direction {
            Some(direction) if dx.abs() > self.config.pan_distance() => {
                self.commit(coordinator, direction);
                GestureOutcome::Commit(direction)
            }
            _ => {
                self.cancel(coordinator);
                GestureOutcome::Cancel
            }
        }
    }

    /// Commit from a button. Produces the same motion as a decisive drag.
    /// Returns `false` while a drag or a fly-out is in progress.
    pub fn trigger(&mut self, coordinator: &StackCoordinator, direction: SwipeDirection) -> bool {
        if self.phase == GesturePhase::Dragging
            || self.is_flying_out()
            || coordinator.is_exhausted()
        {
            debug!(?direction, "button commit ignored");
            return false;
        }
        self.anchor_y.set(0.0);
        self.commit(coordinator, direction);
        true
    }

    fn cancel(&mut self, coordinator: &StackCoordinator) {
        debug!(pan_x = self.pan_x.get(), "gesture cancelled");
        let spring = self.config.cancel_spring;
        self.pan_x.animate(Animation::spring(0.0, spring), None);
        self.pan_y.animate(Animation::spring(0.0, spring), None);
        coordinator.snap_back(self.config.snap_duration());
    }

    fn commit(&mut self, coordinator: &StackCoordinator, direction: SwipeDirection) {
        self.in_flight.store(true, Ordering::Release);
        let duration = self.config.fly_out_duration();
        let stack_index = coordinator.commit(duration);

        self.haptics.impact(match direction {
            SwipeDirection::Right => ImpactStyle::Medium,
            SwipeDirection::Left => ImpactStyle::Light,
        });
        debug!(?direction, stack_index, "card committed");
        self.main.schedule(StackEvent::Committed {
            direction,
            stack_index,
        });

        let pan_x = self.pan_x.clone();
        let pan_y = self.pan_y.clone();
        let animated = coordinator.animated_value().clone();
        let current = coordinator.current_value().clone();
        let in_flight = Arc::clone(&self.in_flight);
        self.pan_x.animate(
            Animation::timing(
                direction.sign() * self.config.fly_out_distance(),
                duration,
                Easing::EaseOut,
            ),
            Some(Box::new(move |_| {
                pan_x.set(0.0);
                pan_y.set(0.0);
                animated.set(current.get() as f64);
                in_flight.store(false, Ordering::Release);
            })),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::dispatch::MainQueue;
    use crate::stack::haptics::RecordingHaptics;
    use std::time::Duration;

    struct Rig {
        coordinator: StackCoordinator,
        gesture: GestureController,
        driver: FrameDriver,
        queue: MainQueue,
        haptics: Arc<RecordingHaptics>,
    }

    impl Rig {
        fn new(len: usize, session_index: usize) -> Self {
            let config = StackConfig::for_viewport(400.0, 800.0);
            let queue = MainQueue::new();
            let haptics = Arc::new(RecordingHaptics::new());
            let coordinator = StackCoordinator::new(len, session_index);
            let gesture = GestureController::new(config, haptics.clone(), queue.handle());
            let mut driver = FrameDriver::new();
            coordinator.attach(&mut driver);
            gesture.attach(&mut driver);
            Self {
                coordinator,
                gesture,
                driver,
                queue,
                haptics,
            }
        }

        fn drag(&mut self, dx: f64) -> GestureOutcome {
            self.gesture.begin(&self.coordinator, 200.0);
            self.gesture.change(&self.coordinator, dx / 2.0, 0.0);
            self.gesture.change(&self.coordinator, dx, 4.0);
            self.gesture.end(&self.coordinator)
        }

        fn settle(&self) {
            for _ in 0..600 {
                if !self.driver.tick(Duration::from_millis(16)) {
                    return;
                }
            }
        }
    }

    #[test]
    fn release_exactly_at_threshold_cancels() {
        let mut rig = Rig::new(3, 0);
        assert_eq!(rig.drag(100.0), GestureOutcome::Cancel);
        assert_eq!(rig.drag(-100.0), GestureOutcome::Cancel);
        assert!(rig.queue.drain().is_empty());
    }

    #[test]
    fn release_past_threshold_commits_in_drag_direction() {
        let mut rig = Rig::new(3, 0);
        assert_eq!(
            rig.drag(100.5),
            GestureOutcome::Commit(SwipeDirection::Right)
        );
        assert_eq!(rig.coordinator.current_index(), 1);
        assert_eq!(
            rig.queue.drain(),
            vec![StackEvent::Committed {
                direction: SwipeDirection::Right,
                stack_index: 2,
            }]
        );
    }

    #[test]
    fn cancel_springs_everything_back() {
        let mut rig = Rig::new(3, 1);
        rig.drag(50.0);
        assert!(rig.coordinator.animated_index() < 1.0);

        rig.settle();

        assert_eq!(rig.coordinator.current_index(), 1);
        assert_eq!(rig.coordinator.animated_index(), 1.0);
        assert_eq!(rig.gesture.pan_x(), 0.0);
        assert_eq!(rig.gesture.pan_y(), 0.0);
        assert!(!rig.coordinator.is_dragging());
    }

    #[test]
    fn threshold_haptic_fires_once_per_gesture() {
        let mut rig = Rig::new(3, 0);
        rig.gesture.begin(&rig.coordinator, 100.0);
        for dx in [120.0, 40.0, 130.0, 20.0, 140.0, 10.0] {
            rig.gesture.change(&rig.coordinator, dx, 0.0);
        }
        assert_eq!(rig.gesture.end(&rig.coordinator), GestureOutcome::Cancel);
        assert_eq!(rig.haptics.impacts(), vec![ImpactStyle::Light]);

        rig.settle();
        rig.gesture.begin(&rig.coordinator, 100.0);
        rig.gesture.change(&rig.coordinator, -150.0, 0.0);
        rig.gesture.end(&rig.coordinator);
        assert_eq!(
            rig.haptics.impacts(),
            vec![ImpactStyle::Light, ImpactStyle::Light, ImpactStyle::Light]
        );
    }

    #[test]
    fn complete_commit_fires_medium_haptic() {
        let mut rig = Rig::new(3, 0);
        assert!(rig.gesture.trigger(&rig.coordinator, SwipeDirection::Right));
        assert_eq!(rig.haptics.impacts(), vec![ImpactStyle::Medium]);
    }

    #[test]
    fn gestures_and_buttons_are_refused_during_fly_out() {
        let mut rig = Rig::new(3, 0);
        assert!(rig.gesture.trigger(&rig.coordinator, SwipeDirection::Left));
        assert!(rig.gesture.is_flying_out());

        assert!(!rig.gesture.trigger(&rig.coordinator, SwipeDirection::Right));
        assert!(!rig.gesture.begin(&rig.coordinator, 10.0));
        rig.gesture.change(&rig.coordinator, 300.0, 0.0);
        assert_eq!(rig.gesture.end(&rig.coordinator), GestureOutcome::Ignored);
        assert_eq!(rig.queue.drain().len(), 1);
        assert_eq!(rig.coordinator.current_index(), 1);

        rig.settle();
        assert!(!rig.gesture.is_flying_out());
        assert_eq!(rig.gesture.pan_x(), 0.0);
        assert!(rig.gesture.trigger(&rig.coordinator, SwipeDirection::Right));
        assert_eq!(rig.coordinator.current_index(), 0);
    }

    #[test]
    fn button_commit_matches_swipe_end_state() {
        let mut swiped = Rig::new(3, 0);
        swiped.drag(180.0);
        swiped.settle();

        let mut pressed = Rig::new(3, 0);
        pressed.gesture.trigger(&pressed.coordinator, SwipeDirection::Right);
        pressed.settle();

        assert_eq!(
            swiped.coordinator.current_index(),
            pressed.coordinator.current_index()
        );
        assert_eq!(
            swiped.coordinator.animated_index(),
            pressed.coordinator.animated_index()
        );
        assert_eq!(swiped.gesture.pan_x(), pressed.gesture.pan_x());
    }

    #[test]
    fn exhausted_stack_ignores_input() {
        let mut rig = Rig::new(1, 0);
        assert!(rig.gesture.trigger(&rig.coordinator, SwipeDirection::Right));
        rig.settle();

        assert!(rig.coordinator.is_exhausted());
        assert!(!rig.gesture.begin(&rig.coordinator, 0.0));
        assert!(!rig.gesture.trigger(&rig.coordinator, SwipeDirection::Left));
    }

    #[test]
    fn drag_progress_never_passes_one_card() {
        let mut rig = Rig::new(3, 0);
        rig.gesture.begin(&rig.coordinator, 0.0);
        rig.gesture.change(&rig.coordinator, 1000.0, 0.0);
        assert_eq!(rig.coordinator.animated_index(), 1.0);
    }
}
