use std::time::Duration;

use crate::animation::{Animation, Easing, FrameDriver, SharedValue};

/// Index bookkeeping shared by every card of one stack.
///
/// Indices are stack positions: the top card of an `n`-question session sits
/// at `n - 1` and each commit decrements `current_index`, so session index
/// `i` is stack index `n - 1 - i`. `-1` means every card has left the stack.
///
/// `animated_index` equals `current_index` at rest and moves toward
/// `current_index - 1` as a drag progresses, never past it.
#[derive(Debug, Clone)]
pub struct StackCoordinator {
    len: usize,
    current_index: SharedValue<isize>,
    previous_index: SharedValue<isize>,
    animated_index: SharedValue<f64>,
    dragging: SharedValue<bool>,
}

impl StackCoordinator {
    /// A stack of `len` cards whose top card is session index `session_index`.
    ///
    /// A `session_index` of `len` or more yields an exhausted stack.
    #[must_use]
    pub fn new(len: usize, session_index: usize) -> Self {
        let current = stack_index_for(len, session_index);
        Self {
            len,
            current_index: SharedValue::new(current),
            previous_index: SharedValue::new(current),
            animated_index: SharedValue::new(current as f64),
            dragging: SharedValue::new(false),
        }
    }

    /// Register the animated values with the frame driver.
    pub fn attach(&self, driver: &mut FrameDriver) {
        driver.track(self.animated_index.clone());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn current_index(&self) -> isize {
        self.current_index.get()
    }

    #[must_use]
    pub fn previous_index(&self) -> isize {
        self.previous_index.get()
    }

    #[must_use]
    pub fn animated_index(&self) -> f64 {
        self.animated_index.get()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    /// No card is left on the stack.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current_index() < 0
    }

    /// Session index of the top card, `len` once the stack is exhausted.
    #[must_use]
    pub fn session_index(&self) -> usize {
        self.session_index_of(self.current_index())
    }

    /// Session index of the card at `stack_index`.
    #[must_use]
    pub fn session_index_of(&self, stack_index: isize) -> usize {
        if stack_index < 0 {
            return self.len;
        }
        let stack_index = stack_index.unsigned_abs();
        self.len.saturating_sub(1).saturating_sub(stack_index)
    }

    /// How far the top card has travelled toward leaving, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (self.current_index() as f64 - self.animated_index()).clamp(0.0, 1.0)
    }

    pub fn set_dragging(&self, dragging: bool) {
        self.dragging.set(dragging);
    }

    /// Follow the drag: `animated_index = current - progress`, floored at `current - 1`.
    pub fn update_progress(&self, progress: f64) {
        let current = self.current_index() as f64;
        let progress = if progress.is_finite() { progress.max(0.0) } else { 0.0 };
        self.animated_index.set((current - progress).max(current - 1.0));
    }

    /// Drop the top card. Returns the stack index it had.
    ///
    /// `animated_index` glides to the new current index over `duration`, so a
    /// button commit reveals the next card the same way a drag does.
    pub fn commit(&self, duration: Duration) -> isize {
        let previous = self.current_index();
        let current = previous - 1;
        self.previous_index.set(previous);
        self.current_index.set(current);
        self.animated_index
            .animate(Animation::timing(current as f64, duration, Easing::EaseOut), None);
        previous
    }

    /// Return `animated_index` to `current_index` over `duration`.
    pub fn snap_back(&self, duration: Duration) {
        let current = self.current_index() as f64;
        self.animated_index
            .animate(Animation::timing(current, duration, Easing::EaseOut), None);
    }

    /// Put `animated_index` back on `current_index` immediately.
    pub fn settle(&self) {
        self.animated_index.set(self.current_index() as f64);
    }

    pub(crate) fn animated_value(&self) -> &SharedValue<f64> {
        &self.animated_index
    }

    pub(crate) fn current_value(&self) -> &SharedValue<isize> {
        &self.current_index
    }
}

fn stack_index_for(len: usize, session_index: usize) -> isize {
    if session_index >= len {
        return -1;
    }
    isize::try_from(len - 1 - session_index).unwrap_or(isize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_card_is_last_stack_index() {
        let coordinator = StackCoordinator::new(3, 0);
        assert_eq!(coordinator.current_index(), 2);
        assert_eq!(coordinator.animated_index(), 2.0);
        assert_eq!(coordinator.session_index(), 0);
    }

    #[test]
    fn resumed_session_maps_to_stack_position() {
        let coordinator = StackCoordinator::new(5, 3);
        assert_eq!(coordinator.current_index(), 1);
        assert_eq!(coordinator.session_index_of(1), 3);
        assert_eq!(coordinator.session_index_of(4), 0);
    }

    #[test]
    fn finished_session_is_exhausted() {
        let coordinator = StackCoordinator::new(3, 3);
        assert!(coordinator.is_exhausted());
        assert_eq!(coordinator.session_index(), 3);
    }

    #[test]
    fn progress_is_clamped_to_one_card() {
        let coordinator = StackCoordinator::new(3, 0);
        coordinator.update_progress(0.4);
        assert!((coordinator.animated_index() - 1.6).abs() < 1e-12);

        coordinator.update_progress(3.0);
        assert_eq!(coordinator.animated_index(), 1.0);
        assert_eq!(coordinator.progress(), 1.0);
    }

    #[test]
    fn negative_or_nan_progress_is_rest() {
        let coordinator = StackCoordinator::new(3, 0);
        coordinator.update_progress(f64::NAN);
        assert_eq!(coordinator.animated_index(), 2.0);
        coordinator.update_progress(-0.5);
        assert_eq!(coordinator.animated_index(), 2.0);
    }

    #[test]
    fn commit_decrements_and_records_previous() {
        let coordinator = StackCoordinator::new(3, 0);
        let mut driver = FrameDriver::new();
        coordinator.attach(&mut driver);

        let left = coordinator.commit(Duration::from_millis(300));

        assert_eq!(left, 2);
        assert_eq!(coordinator.previous_index(), 2);
        assert_eq!(coordinator.current_index(), 1);
        assert_eq!(coordinator.session_index(), 1);

        driver.tick(Duration::from_millis(400));
        assert_eq!(coordinator.animated_index(), 1.0);
    }

    #[test]
    fn snap_back_returns_exactly_to_current() {
        let coordinator = StackCoordinator::new(3, 1);
        let mut driver = FrameDriver::new();
        coordinator.attach(&mut driver);
        coordinator.update_progress(0.5);

        coordinator.snap_back(Duration::from_millis(150));
        while driver.tick(Duration::from_millis(16)) {}

        assert_eq!(coordinator.animated_index(), 1.0);
        assert_eq!(coordinator.current_index(), 1);
    }
}
