#![forbid(unsafe_code)]

pub mod app_services;
pub mod deck_service;
pub mod error;
pub mod sessions;

pub use convo_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use deck_service::{DEFAULT_FREE_QUESTION_LIMIT, DeckOverview, DeckService};
pub use error::{AppServicesError, DeckServiceError, SessionStoreError};
pub use sessions::{SessionMachine, SessionProgress, SessionStoreService, Transition};
