//! External collaborators: deck source, persistent history store, and the
//! calendar webhook. The engines never talk to these directly.

pub mod calendar;
pub mod deck_source;
pub mod history_store;

pub use calendar::CalendarClient;
pub use deck_source::{DeckOrigin, DeckSource, LoadedDeck};
pub use history_store::{load_history, HistoryLoad, HistoryWriter};
