//! Hand-off from the gesture domain to the thread that owns the session.
//!
//! Gesture and frame callbacks never touch the session directly. They
//! schedule a [`StackEvent`] and the screen controller applies it when it
//! drains the queue.

use convo_core::model::SwipeDirection;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEvent {
    /// A card left the stack. `stack_index` is its position before the commit.
    Committed {
        direction: SwipeDirection,
        stack_index: isize,
    },
}

/// Sending side, held by the gesture controller.
#[derive(Debug, Clone)]
pub struct MainHandle {
    tx: UnboundedSender<StackEvent>,
}

impl MainHandle {
    /// Queue `event`. Returns `false` if the receiving side is gone.
    pub fn schedule(&self, event: StackEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(err) => {
                warn!(event = ?err.0, "main queue closed, dropping event");
                false
            }
        }
    }
}

/// Receiving side, drained on the main thread.
#[derive(Debug)]
pub struct MainQueue {
    tx: UnboundedSender<StackEvent>,
    rx: UnboundedReceiver<StackEvent>,
}

impl MainQueue {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    #[must_use]
    pub fn handle(&self) -> MainHandle {
        MainHandle {
            tx: self.tx.clone(),
        }
    }

    /// Take every event queued so far, in order.
    pub fn drain(&mut self) -> Vec<StackEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<StackEvent> {
        self.rx.recv().await
    }
}

impl Default for MainQueue {
    fn default() -> Self {
        Self::new()
    }
}
