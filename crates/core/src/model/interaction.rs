use serde::{Deserialize, Serialize};

/// How a question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Completed,
    Skipped,
}

/// Horizontal direction a card leaves the stack in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Direction of a horizontal displacement; `None` for zero or NaN.
    #[must_use]
    pub fn from_offset(dx: f64) -> Option<Self> {
        if dx > 0.0 {
            Some(SwipeDirection::Right)
        } else if dx < 0.0 {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    }

    /// Right completes a question, left skips it.
    #[must_use]
    pub fn interaction(self) -> InteractionKind {
        match self {
            SwipeDirection::Right => InteractionKind::Completed,
            SwipeDirection::Left => InteractionKind::Skipped,
        }
    }

    /// +1.0 for right, -1.0 for left.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            SwipeDirection::Right => 1.0,
            SwipeDirection::Left => -1.0,
        }
    }
}

impl From<InteractionKind> for SwipeDirection {
    fn from(kind: InteractionKind) -> Self {
        match kind {
            InteractionKind::Completed => SwipeDirection::Right,
            InteractionKind::Skipped => SwipeDirection::Left,
        }
    }
}
