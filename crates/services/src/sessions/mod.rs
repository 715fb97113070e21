mod machine;
mod progress;
mod service;

// Public API of the session subsystem.
pub use crate::error::SessionStoreError;
pub use machine::{SessionMachine, Transition};
pub use progress::SessionProgress;
pub use service::SessionStoreService;
