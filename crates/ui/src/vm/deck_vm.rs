use convo_core::model::DeckId;
use services::DeckOverview;

/// UI-ready representation of a deck tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckCardVm {
    pub id: DeckId,
    pub name: String,
    pub description: Option<String>,
    pub category: &'static str,
    pub theme_color: &'static str,
    pub count_label: String,
    pub locked_label: Option<String>,
    pub suggested: bool,
}

/// Convert deck overviews into tile view models, keeping their order.
/// The tile for `preferred` is flagged as the suggested one.
#[must_use]
pub fn map_deck_cards(overviews: &[DeckOverview], preferred: DeckId) -> Vec<DeckCardVm> {
    overviews
        .iter()
        .map(|overview| {
            let deck = &overview.deck;
            let locked = overview.locked();
            DeckCardVm {
                id: deck.id(),
                name: deck.name().to_owned(),
                description: deck.description().map(str::to_owned),
                category: category_label(deck.category().as_str()),
                theme_color: deck.theme_color(),
                count_label: format_count(overview.total),
                locked_label: (locked > 0).then(|| format!("{locked} locked")),
                suggested: deck.id() == preferred,
            }
        })
        .collect()
}

fn format_count(total: usize) -> String {
    match total {
        1 => "1 question".to_owned(),
        n => format!("{n} questions"),
    }
}

fn category_label(raw: &'static str) -> &'static str {
    match raw {
        "self_reflection" => "self reflection",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convo_core::model::{Deck, DeckCategory};

    fn overview(id: u64, total: usize, visible: usize) -> DeckOverview {
        let deck = Deck::new(
            DeckId::new(id),
            "Late Night",
            Some("After the lights go out".to_owned()),
            DeckCategory::SelfReflection,
            None,
        )
        .unwrap();
        DeckOverview {
            deck,
            total,
            visible,
        }
    }

    #[test]
    fn locked_label_only_when_questions_are_gated() {
        let cards = map_deck_cards(&[overview(4, 12, 5), overview(5, 3, 3)], DeckId::new(1));
        assert_eq!(cards[0].locked_label.as_deref(), Some("7 locked"));
        assert_eq!(cards[1].locked_label, None);
        assert_eq!(cards[0].count_label, "12 questions");
    }

    #[test]
    fn tile_carries_category_theme() {
        let cards = map_deck_cards(&[overview(4, 1, 1)], DeckId::new(1));
        assert_eq!(cards[0].category, "self reflection");
        assert_eq!(cards[0].theme_color, "#5B7DB1");
        assert_eq!(cards[0].count_label, "1 question");
    }

    #[test]
    fn only_the_preferred_deck_is_suggested() {
        let cards = map_deck_cards(&[overview(4, 3, 3), overview(5, 3, 3)], DeckId::new(5));
        assert!(!cards[0].suggested);
        assert!(cards[1].suggested);
    }
}
