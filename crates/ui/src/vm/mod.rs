mod deck_vm;
mod session_vm;
mod stack_vm;

pub use deck_vm::{DeckCardVm, map_deck_cards};
pub use session_vm::{SessionOpened, open_session};
pub use stack_vm::{CardVm, StackVm, hint_label, position_label};
