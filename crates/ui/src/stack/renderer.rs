use std::fmt::Write as _;

use convo_core::model::{Question, QuestionId, SwipeDirection};

use crate::animation::lerp;

use super::config::StackConfig;
use super::coordinator::StackCoordinator;
use super::gesture::GestureController;

/// Everything the renderer reads, captured once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSnapshot {
    pub current_index: isize,
    pub previous_index: isize,
    pub animated_index: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub anchor_y: f64,
    pub dragging: bool,
    pub flying_out: bool,
}

impl AnimationSnapshot {
    #[must_use]
    pub fn capture(coordinator: &StackCoordinator, gesture: &GestureController) -> Self {
        Self {
            current_index: coordinator.current_index(),
            previous_index: coordinator.previous_index(),
            animated_index: coordinator.animated_index(),
            pan_x: gesture.pan_x(),
            pan_y: gesture.pan_y(),
            anchor_y: gesture.anchor_y(),
            dragging: coordinator.is_dragging(),
            flying_out: gesture.is_flying_out(),
        }
    }

    /// A resting stack whose top card is at `current_index`.
    #[must_use]
    pub fn at_rest(current_index: isize) -> Self {
        Self {
            current_index,
            previous_index: current_index,
            animated_index: current_index as f64,
            pan_x: 0.0,
            pan_y: 0.0,
            anchor_y: 0.0,
            dragging: false,
            flying_out: false,
        }
    }

    /// Stack index of the card that follows the pan: the departing card
    /// while one is flying out, the current card otherwise.
    #[must_use]
    pub fn top_index(&self) -> isize {
        if self.flying_out {
            self.previous_index
        } else {
            self.current_index
        }
    }

    /// How far the top card has travelled toward leaving, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let progress = self.top_index() as f64 - self.animated_index;
        if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardRole {
    /// Follows the pan.
    Top,
    /// Waits underneath and fades in during the second half of a swipe.
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotate_deg: f64,
    pub scale: f64,
    pub opacity: f64,
    pub z_index: i32,
}

impl CardTransform {
    #[must_use]
    pub fn resting() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            rotate_deg: 0.0,
            scale: 1.0,
            opacity: 1.0,
            z_index: 2,
        }
    }

    /// Inline CSS for the card element.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = String::with_capacity(128);
        let _ = write!(
            css,
            "transform: translate3d({:.2}px, {:.2}px, 0) rotate({:.2}deg) scale({:.3}); \
             opacity: {:.3}; z-index: {};",
            self.translate_x,
            self.translate_y,
            self.rotate_deg,
            self.scale,
            self.opacity,
            self.z_index,
        );
        css
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardFrame {
    pub question_id: QuestionId,
    pub session_index: usize,
    pub text: String,
    pub role: CardRole,
    pub transform: CardTransform,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StackFrame {
    /// Top card first; never more than two.
    pub cards: Vec<CardFrame>,
    /// Direction the top card would leave in, shown only while dragging.
    pub hint: Option<SwipeDirection>,
    pub progress: f64,
}

impl StackFrame {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The two-card window starting at `session_index`.
#[must_use]
pub fn visible_window(questions: &[Question], session_index: usize) -> &[Question] {
    let start = session_index.min(questions.len());
    let end = session_index.saturating_add(2).min(questions.len());
    &questions[start..end]
}

/// Tilt of the top card. Drags anchored in the lower half of the viewport
/// tilt the other way.
#[must_use]
pub fn rotation(pan_x: f64, anchor_y: f64, config: &StackConfig) -> f64 {
    let distance = config.rotation_distance();
    if distance <= 0.0 || !pan_x.is_finite() {
        return 0.0;
    }
    let sign = if anchor_y > config.viewport_height / 2.0 {
        -1.0
    } else {
        1.0
    };
    sign * config.max_rotation_deg * (pan_x / distance).clamp(-1.0, 1.0)
}

/// Hidden until half way, then linear up to fully opaque.
#[must_use]
pub fn next_card_opacity(progress: f64) -> f64 {
    if progress <= 0.5 {
        0.0
    } else {
        ((progress - 0.5) * 2.0).min(1.0)
    }
}

#[must_use]
pub fn card_style(role: CardRole, snapshot: &AnimationSnapshot, config: &StackConfig) -> CardTransform {
    match role {
        CardRole::Top => CardTransform {
            translate_x: snapshot.pan_x,
            translate_y: snapshot.pan_y,
            rotate_deg: rotation(snapshot.pan_x, snapshot.anchor_y, config),
            ..CardTransform::resting()
        },
        CardRole::Next => {
            let progress = snapshot.progress();
            CardTransform {
                translate_x: 0.0,
                translate_y: lerp(config.stack_offset_y, 0.0, progress),
                rotate_deg: 0.0,
                scale: lerp(config.stack_scale, 1.0, progress),
                opacity: next_card_opacity(progress),
                z_index: 1,
            }
        }
    }
}

/// Lay out the visible cards of a session-ordered question list.
#[must_use]
pub fn render_frame(
    questions: &[Question],
    snapshot: &AnimationSnapshot,
    config: &StackConfig,
) -> StackFrame {
    let top = snapshot.top_index();
    let progress = snapshot.progress();
    let hint = if snapshot.dragging {
        SwipeDirection::from_offset(snapshot.pan_x)
    } else {
        None
    };
    if top < 0 || questions.is_empty() {
        return StackFrame {
            cards: Vec::new(),
            hint: None,
            progress,
        };
    }

    let session_index = questions
        .len()
        .saturating_sub(1)
        .saturating_sub(top.unsigned_abs());
    let cards = visible_window(questions, session_index)
        .iter()
        .zip([CardRole::Top, CardRole::Next])
        .enumerate()
        .map(|(offset, (question, role))| CardFrame {
            question_id: question.id(),
            session_index: session_index + offset,
            text: question.text().to_string(),
            role,
            transform: card_style(role, snapshot, config),
        })
        .collect();

    StackFrame {
        cards,
        hint,
        progress,
    }
}
