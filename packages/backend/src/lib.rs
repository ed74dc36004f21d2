pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use tango_engine::{HistoryLedger, SessionSettings, TrainerSession, VocabularyStore};

use crate::config::Config;
use crate::services::{load_history, CalendarClient, DeckSource, HistoryLoad, HistoryWriter};
use crate::state::AppState;

/// Build the full application router: restore the history ledger, load the
/// configured deck, and wire the collaborators into shared state.
pub async fn create_app(config: &Config) -> axum::Router {
    let load = load_history(&config.data_dir).await;
    if let HistoryLoad::Unreadable(ref reason) = load {
        tracing::warn!(reason, "history file unreadable, starting with empty ledger");
    }
    let ledger = HistoryLedger::from_records(load.into_records());

    let mut session = match config.rng_seed {
        Some(seed) => TrainerSession::with_seed(VocabularyStore::sample(), ledger, seed),
        None => TrainerSession::new(VocabularyStore::sample(), ledger),
    };

    let deck_source = DeckSource::new(
        config.default_deck_url.clone(),
        config.decks_file.as_deref(),
    );

    let settings = SessionSettings::default();
    let loaded = deck_source.load(Some(&settings.deck_id)).await;
    session.replace_store(loaded.store);
    let outcome = session.apply_settings(SessionSettings {
        deck_id: loaded.deck_id,
        ..settings
    });
    tracing::info!(deck_len = outcome.deck_len, "initial deck selected");

    let history = HistoryWriter::spawn(&config.data_dir);
    let calendar = config.calendar_url.clone().map(CalendarClient::new);

    let state = AppState::new(session, deck_source, history, calendar);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
