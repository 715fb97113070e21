use std::sync::Arc;
use std::time::Duration;

use convo_core::model::{InteractionKind, Question, SwipeDirection};
use services::{SessionStoreError, SessionStoreService};
use tracing::{debug, warn};

use crate::animation::FrameDriver;

use super::config::StackConfig;
use super::coordinator::StackCoordinator;
use super::dispatch::{MainQueue, StackEvent};
use super::gesture::{GestureController, GestureOutcome};
use super::haptics::Haptics;
use super::renderer::{AnimationSnapshot, StackFrame, render_frame};

/// Screen-level owner of one card stack.
///
/// Input methods only touch animation state and queue commits. The session
/// is advanced when the queue is drained through [`pump`](Self::pump) (or
/// [`drain_commits`](Self::drain_commits) plus [`apply_commits`]), which
/// always runs after the stack index has moved.
pub struct CardStackController {
    config: StackConfig,
    store: Arc<SessionStoreService>,
    haptics: Arc<dyn Haptics>,
    questions: Vec<Question>,
    coordinator: StackCoordinator,
    gesture: GestureController,
    driver: FrameDriver,
    queue: MainQueue,
}

impl CardStackController {
    /// Build a stack over the store's active session.
    ///
    /// Without an active session the stack is empty.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Poisoned` if the session cannot be read.
    pub fn new(
        store: Arc<SessionStoreService>,
        config: StackConfig,
        haptics: Arc<dyn Haptics>,
    ) -> Result<Self, SessionStoreError> {
        let queue = MainQueue::new();
        let gesture = GestureController::new(config, Arc::clone(&haptics), queue.handle());
        let mut controller = Self {
            config,
            store,
            haptics,
            questions: Vec::new(),
            coordinator: StackCoordinator::new(0, 0),
            gesture,
            driver: FrameDriver::new(),
            queue,
        };
        controller.reload()?;
        Ok(controller)
    }

    /// Rebuild the stack from the store, dropping any animation in flight
    /// and any commit not yet applied.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError::Poisoned` if the session cannot be read.
    pub fn reload(&mut self) -> Result<(), SessionStoreError> {
        let (questions, session_index) = self.store.read(|machine| {
            machine.current_session().map_or((Vec::new(), 0), |session| {
                let finished = session.resolved() >= session.len() as u64;
                let index = if finished {
                    session.len()
                } else {
                    session.current_index()
                };
                (session.questions().to_vec(), index)
            })
        })?;

        let dropped = self.queue.drain();
        if !dropped.is_empty() {
            warn!(count = dropped.len(), "dropping unapplied commits on reload");
        }

        self.coordinator = StackCoordinator::new(questions.len(), session_index);
        self.gesture = GestureController::new(
            self.config,
            Arc::clone(&self.haptics),
            self.queue.handle(),
        );
        self.driver = FrameDriver::new();
        self.coordinator.attach(&mut self.driver);
        self.gesture.attach(&mut self.driver);
        self.questions = questions;
        debug!(
            questions = self.questions.len(),
            session_index, "card stack loaded"
        );
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    #[must_use]
    pub fn coordinator(&self) -> &StackCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn gesture(&self) -> &GestureController {
        &self.gesture
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Every card has left the stack.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.questions.is_empty() && self.coordinator.is_exhausted() && !self.is_animating()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.driver.is_animating()
    }

    /// Pointer went down at viewport position `(_x, y)`.
    pub fn begin_drag(&mut self, _x: f64, y: f64) -> bool {
        self.gesture.begin(&self.coordinator, y)
    }

    /// Pointer moved; `dx`/`dy` are the translation since `begin_drag`.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.gesture.change(&self.coordinator, dx, dy);
    }

    pub fn end_drag(&mut self) -> GestureOutcome {
        self.gesture.end(&self.coordinator)
    }

    pub fn complete(&mut self) -> bool {
        self.gesture.trigger(&self.coordinator, SwipeDirection::Right)
    }

    pub fn skip(&mut self) -> bool {
        self.gesture.trigger(&self.coordinator, SwipeDirection::Left)
    }

    /// Advance animations by one frame. Returns whether any is still running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.driver.tick(dt)
    }

    #[must_use]
    pub fn snapshot(&self) -> AnimationSnapshot {
        AnimationSnapshot::capture(&self.coordinator, &self.gesture)
    }

    #[must_use]
    pub fn frame(&self) -> StackFrame {
        render_frame(&self.questions, &self.snapshot(), &self.config)
    }

    /// Take the queued commits as interactions, in commit order.
    pub fn drain_commits(&mut self) -> Vec<InteractionKind> {
        self.queue
            .drain()
            .into_iter()
            .map(|event| match event {
                StackEvent::Committed {
                    direction,
                    stack_index,
                } => {
                    debug!(
                        ?direction,
                        session_index = self.coordinator.session_index_of(stack_index),
                        "applying commit"
                    );
                    direction.interaction()
                }
            })
            .collect()
    }

    /// Apply every queued commit to the session. Returns how many were applied.
    ///
    /// # Errors
    ///
    /// Returns the first `SessionStoreError` hit while persisting; later
    /// commits are still applied.
    pub async fn pump(&mut self) -> Result<usize, SessionStoreError> {
        let commits = self.drain_commits();
        apply_commits(&self.store, &commits).await
    }
}

/// Advance the session once per commit: move to the next question, then
/// record the interaction.
///
/// # Errors
///
/// Returns the first `SessionStoreError` hit; remaining commits are still
/// applied to the in-memory session.
pub async fn apply_commits(
    store: &SessionStoreService,
    commits: &[InteractionKind],
) -> Result<usize, SessionStoreError> {
    let mut first_error = None;
    for kind in commits {
        if let Err(err) = store.commit(*kind).await {
            warn!(error = %err, ?kind, "commit not persisted");
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(commits.len()),
    }
}
