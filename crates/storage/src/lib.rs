#![forbid(unsafe_code)]

pub mod fixtures;
pub mod repository;
pub mod snapshot;
pub mod sqlite;

pub use repository::{
    DeckRepository, InMemoryRepository, QuestionRepository, SessionSnapshotRepository, Storage,
    StorageError,
};
pub use snapshot::{PersistedSessionState, SESSION_STORE_KEY};
