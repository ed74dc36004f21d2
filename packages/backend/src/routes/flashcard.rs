//! Flashcard endpoints. The back face and explanation are withheld until
//! the card is flipped.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use tango_engine::{Mastery, TrainerSession};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(current))
        .route("/flip", post(flip))
        .route("/mark", post(mark))
        .route("/restart", post(restart))
}

#[derive(Debug, Serialize)]
struct CardFace {
    front: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    mastery: Mastery,
}

#[derive(Debug, Serialize)]
struct FlashcardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    card: Option<CardFace>,
    index: usize,
    deck_len: usize,
    flipped: bool,
    exhausted: bool,
}

#[derive(Debug, Deserialize)]
struct MarkRequest {
    known: bool,
}

fn flashcard_view(session: &mut TrainerSession) -> FlashcardView {
    let flipped = session.flashcards.flipped;
    let deck_len = session.deck().len();
    let current = session.flash_current().cloned();
    let index = session.flashcards.index;
    let exhausted = session.flashcards.is_exhausted();

    let card = current.map(|item| {
        let mastery = session.ledger.mastery(&item.front);
        CardFace {
            front: item.front,
            back: flipped.then_some(item.back),
            explanation: if flipped { item.explanation } else { None },
            mastery,
        }
    });

    FlashcardView {
        card,
        index,
        deck_len,
        flipped,
        exhausted,
    }
}

async fn current(State(state): State<AppState>) -> Json<FlashcardView> {
    let mut session = state.session().write().await;
    Json(flashcard_view(&mut session))
}

async fn flip(State(state): State<AppState>) -> Json<FlashcardView> {
    let mut session = state.session().write().await;
    session.flash_flip();
    Json(flashcard_view(&mut session))
}

async fn mark(
    State(state): State<AppState>,
    Json(req): Json<MarkRequest>,
) -> Json<FlashcardView> {
    let mut session = state.session().write().await;
    session.flash_mark(req.known);
    let view = flashcard_view(&mut session);

    if req.known {
        let snapshot = session.ledger.records().to_vec();
        drop(session);
        state.history().persist(snapshot);
    }
    Json(view)
}

async fn restart(State(state): State<AppState>) -> Json<FlashcardView> {
    let mut session = state.session().write().await;
    session.flash_restart();
    Json(flashcard_view(&mut session))
}
