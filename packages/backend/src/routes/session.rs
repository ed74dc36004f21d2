//! Session configuration surface: deck picker, limit, mastery filter and
//! matching pair count. Changing any component crosses a deck-key epoch
//! and silently resets all engine progress.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use tango_engine::{DeckLimit, SessionSettings, TrainerSession};

use crate::response::AppError;
use crate::services::DeckOrigin;
use crate::state::AppState;
use tango_engine::types::MATCH_PAIR_CHOICES;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(current).put(apply))
}

#[derive(Debug, Deserialize)]
struct ApplySettingsRequest {
    /// Preset name, URL, local path, or "sample"; absent keeps the deck
    deck: Option<String>,
    /// Items per session; absent or null means "all"
    limit: Option<usize>,
    #[serde(default)]
    filter_mastered: bool,
    pair_count: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SessionView {
    deck_id: String,
    deck_len: usize,
    /// No items survive the mastery filter — a terminal "nothing to
    /// study" condition, not an error
    empty: bool,
    limit: Option<usize>,
    filter_mastered: bool,
    pair_count: usize,
    epoch_changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    origin: Option<DeckOrigin>,
    presets: Vec<String>,
}

fn view(
    session: &TrainerSession,
    epoch_changed: bool,
    origin: Option<DeckOrigin>,
    presets: Vec<String>,
) -> SessionView {
    let settings = session.settings();
    SessionView {
        deck_id: settings.deck_id.clone(),
        deck_len: session.deck().len(),
        empty: session.deck().is_empty(),
        limit: settings.limit.as_option(),
        filter_mastered: settings.filter_mastered,
        pair_count: settings.pair_count,
        epoch_changed,
        origin,
        presets,
    }
}

async fn current(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session().read().await;
    Json(view(
        &session,
        false,
        None,
        state.deck_source().preset_names(),
    ))
}

async fn apply(
    State(state): State<AppState>,
    Json(req): Json<ApplySettingsRequest>,
) -> Result<Json<SessionView>, AppError> {
    let pair_count = req.pair_count.unwrap_or(8);
    if !MATCH_PAIR_CHOICES.contains(&pair_count) {
        return Err(AppError::validation(format!(
            "配对数只能是 {MATCH_PAIR_CHOICES:?} 之一"
        )));
    }

    // an absent deck field keeps the active locator
    let requested = match req.deck {
        Some(deck) => deck,
        None => state.session().read().await.settings().deck_id.clone(),
    };
    // resolve the deck before taking the write lock; a slow fetch must
    // not wedge concurrent reads
    let loaded = state.deck_source().load(Some(&requested)).await;

    let mut session = state.session().write().await;
    session.replace_store(loaded.store);
    let outcome = session.apply_settings(SessionSettings {
        deck_id: loaded.deck_id,
        limit: DeckLimit::from_option(req.limit),
        filter_mastered: req.filter_mastered,
        pair_count,
    });

    Ok(Json(view(
        &session,
        outcome.epoch_changed,
        Some(loaded.origin),
        state.deck_source().preset_names(),
    )))
}
