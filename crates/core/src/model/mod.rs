mod deck;
mod entitlement;
mod ids;
mod interaction;
mod question;
mod session;
mod tag;

pub use ids::{DeckId, ParseIdError, QuestionId, SessionId};

pub use deck::{Deck, DeckCategory, DeckError};
pub use entitlement::Entitlement;
pub use interaction::{InteractionKind, SwipeDirection};
pub use question::{Depth, Question, QuestionError, QuestionStats};
pub use session::{Session, SessionError};
pub use tag::{TagError, TagName};
