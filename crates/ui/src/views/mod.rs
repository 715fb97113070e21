mod card_stack;
mod deck_list;
mod session;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use card_stack::CardStackView;
pub use deck_list::DeckListView;
pub use session::SessionView;
pub use state::{ViewError, ViewState, view_state_from_resource};
