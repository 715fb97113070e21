use convo_core::model::SwipeDirection;
use services::SessionProgress;

use crate::stack::{CardRole, CardStackController, StackFrame};

/// One rendered card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardVm {
    pub key: String,
    pub text: String,
    pub style: String,
    pub class: &'static str,
}

/// Everything the card stack screen shows for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct StackVm {
    pub cards: Vec<CardVm>,
    pub position_label: String,
    pub resolved_label: String,
    pub hint: Option<&'static str>,
    pub finished: bool,
}

impl StackVm {
    #[must_use]
    pub fn from_controller(controller: &CardStackController, progress: &SessionProgress) -> Self {
        let coordinator = controller.coordinator();
        let frame = controller.frame();
        Self::from_frame(
            &frame,
            coordinator.session_index(),
            coordinator.len(),
            progress,
            controller.is_finished(),
        )
    }

    #[must_use]
    pub fn from_frame(
        frame: &StackFrame,
        session_index: usize,
        len: usize,
        progress: &SessionProgress,
        finished: bool,
    ) -> Self {
        // Painted bottom-up so the top card ends up last in the DOM.
        let cards = frame
            .cards
            .iter()
            .rev()
            .map(|card| CardVm {
                key: card.question_id.to_string(),
                text: card.text.clone(),
                style: card.transform.to_css(),
                class: match card.role {
                    CardRole::Top => "card card--top",
                    CardRole::Next => "card card--next",
                },
            })
            .collect();

        Self {
            cards,
            position_label: position_label(session_index, len),
            resolved_label: format!("{:.0}% answered", progress.percentage),
            hint: frame.hint.map(hint_label),
            finished,
        }
    }
}

/// `"n / total"` for the card on top, 1-based.
#[must_use]
pub fn position_label(session_index: usize, len: usize) -> String {
    let shown = if len == 0 {
        0
    } else {
        (session_index + 1).min(len)
    };
    format!("{shown} / {len}")
}

#[must_use]
pub fn hint_label(direction: SwipeDirection) -> &'static str {
    match direction {
        SwipeDirection::Right => "Complete",
        SwipeDirection::Left => "Skip",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::{CardFrame, CardTransform};
    use convo_core::model::QuestionId;

    fn card(id: u64, role: CardRole) -> CardFrame {
        CardFrame {
            question_id: QuestionId::new(id),
            session_index: 0,
            text: format!("Q{id}"),
            role,
            transform: CardTransform::resting(),
        }
    }

    #[test]
    fn position_is_clamped_when_exhausted() {
        assert_eq!(position_label(0, 5), "1 / 5");
        assert_eq!(position_label(5, 5), "5 / 5");
        assert_eq!(position_label(0, 0), "0 / 0");
    }

    #[test]
    fn top_card_renders_last() {
        let frame = StackFrame {
            cards: vec![card(1, CardRole::Top), card(2, CardRole::Next)],
            hint: Some(SwipeDirection::Left),
            progress: 0.0,
        };
        let vm = StackVm::from_frame(&frame, 0, 4, &SessionProgress::new(1, 4), false);

        assert_eq!(vm.cards[0].class, "card card--next");
        assert_eq!(vm.cards[1].text, "Q1");
        assert_eq!(vm.hint, Some("Skip"));
        assert_eq!(vm.resolved_label, "25% answered");
    }
}
