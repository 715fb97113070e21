use serde::{Deserialize, Serialize};

/// Whether the user unlocked the full question set of every deck.
///
/// The gate is applied before questions reach a session; sessions have no
/// notion of locked questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entitlement {
    #[default]
    Free,
    Premium,
}

impl Entitlement {
    #[must_use]
    pub fn from_premium_flag(is_premium: bool) -> Self {
        if is_premium {
            Entitlement::Premium
        } else {
            Entitlement::Free
        }
    }

    #[must_use]
    pub fn is_premium(self) -> bool {
        matches!(self, Entitlement::Premium)
    }

    /// Number of questions out of `total` this entitlement may see.
    #[must_use]
    pub fn visible_count(self, total: usize, free_limit: usize) -> usize {
        match self {
            Entitlement::Premium => total,
            Entitlement::Free => total.min(free_limit),
        }
    }
}
