//! Four-choice quiz endpoints.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use tango_engine::{Mastery, TrainerSession};

use crate::response::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(current))
        .route("/next", post(next))
        .route("/answer", post(answer))
        .route("/restart", post(restart))
}

#[derive(Debug, Serialize)]
struct QuestionView {
    front: String,
    options: Vec<String>,
    /// Color-coding hint derived from the history ledger
    mastery: Mastery,
}

#[derive(Debug, Serialize)]
struct QuizView {
    finished: bool,
    answered: bool,
    was_correct: bool,
    score: u32,
    total_answered: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<QuestionView>,
}

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    option: String,
}

#[derive(Debug, Serialize)]
struct AnswerResponse {
    /// False when there was no open question (guarded no-op)
    accepted: bool,
    was_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    score: u32,
    total_answered: u32,
}

fn view(session: &TrainerSession) -> QuizView {
    let quiz = &session.quiz;
    QuizView {
        finished: quiz.finished,
        answered: quiz.answered,
        was_correct: quiz.was_correct,
        score: quiz.score,
        total_answered: quiz.total_answered,
        question: quiz.current.as_ref().map(|item| QuestionView {
            front: item.front.clone(),
            options: quiz.options.clone(),
            mastery: session.ledger.mastery(&item.front),
        }),
    }
}

async fn current(State(state): State<AppState>) -> Json<QuizView> {
    let session = state.session().read().await;
    Json(view(&session))
}

async fn next(State(state): State<AppState>) -> Result<Json<QuizView>, AppError> {
    let mut session = state.session().write().await;
    session.quiz_next()?;
    Ok(Json(view(&session)))
}

async fn answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Json<AnswerResponse> {
    let mut session = state.session().write().await;
    let accepted = session.quiz_answer(&req.option).is_some();

    let current = session.quiz.current.as_ref();
    let response = AnswerResponse {
        accepted,
        was_correct: session.quiz.was_correct,
        correct_answer: current.map(|item| item.back.clone()),
        explanation: current.and_then(|item| item.explanation.clone()),
        score: session.quiz.score,
        total_answered: session.quiz.total_answered,
    };

    if accepted {
        let snapshot = session.ledger.records().to_vec();
        drop(session);
        state.history().persist(snapshot);
    }

    Json(response)
}

async fn restart(State(state): State<AppState>) -> Json<QuizView> {
    let mut session = state.session().write().await;
    session.quiz_restart();
    Json(view(&session))
}
