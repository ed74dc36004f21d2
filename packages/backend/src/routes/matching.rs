//! Matching-game endpoints. Card texts stay server-side until a card is
//! revealed or matched, so the board response is the only thing a client
//! ever sees.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use tango_engine::{ClickOutcome, TrainerSession};

use crate::response::AppError;
use crate::state::{now_secs, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(board))
        .route("/round", post(round))
        .route("/click", post(click))
        .route("/advance", post(advance))
        .route("/reset-cleared", post(reset_cleared))
        .route("/calendar", post(register_calendar))
}

#[derive(Debug, Serialize)]
struct CardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    revealed: bool,
    matched: bool,
}

#[derive(Debug, Serialize)]
struct BoardView {
    cards: Vec<CardView>,
    attempts: u32,
    finished: bool,
    elapsed_seconds: f64,
    pair_count: usize,
    first_selection: Option<usize>,
    /// Pairs excluded from upcoming rounds by repeat avoidance
    cleared_pairs: usize,
}

#[derive(Debug, Deserialize)]
struct ClickRequest {
    index: usize,
}

#[derive(Debug, Serialize)]
struct ClickResponse {
    outcome: &'static str,
    round_cleared: bool,
    board: BoardView,
}

fn board_view(session: &TrainerSession, now: f64) -> BoardView {
    let matching = &session.matching;
    let cards = matching
        .cards
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            let matched = matching.matched.contains(&idx);
            let revealed = matching.revealed[idx];
            CardView {
                text: (revealed || matched).then(|| card.text.clone()),
                revealed,
                matched,
            }
        })
        .collect();

    BoardView {
        cards,
        attempts: matching.attempts,
        finished: matching.finished,
        elapsed_seconds: matching.elapsed(now),
        pair_count: session.settings().pair_count,
        first_selection: matching.first_selection,
        cleared_pairs: matching.cleared_pair_keys.len(),
    }
}

async fn board(State(state): State<AppState>) -> Json<BoardView> {
    let session = state.session().read().await;
    Json(board_view(&session, now_secs()))
}

async fn round(State(state): State<AppState>) -> Result<Json<BoardView>, AppError> {
    let mut session = state.session().write().await;
    session.match_init(now_secs())?;
    Ok(Json(board_view(&session, now_secs())))
}

async fn click(
    State(state): State<AppState>,
    Json(req): Json<ClickRequest>,
) -> Json<ClickResponse> {
    let mut session = state.session().write().await;
    let outcome = session.match_click(req.index, now_secs());

    let (label, round_cleared, mutated) = match &outcome {
        ClickOutcome::Ignored => ("ignored", false, false),
        ClickOutcome::FirstRevealed => ("first_revealed", false, false),
        ClickOutcome::Matched { round_cleared, .. } => ("matched", *round_cleared, true),
        ClickOutcome::Mismatched => ("mismatched", false, true),
    };

    let response = ClickResponse {
        outcome: label,
        round_cleared,
        board: board_view(&session, now_secs()),
    };

    if mutated {
        let snapshot = session.ledger.records().to_vec();
        drop(session);
        state.history().persist(snapshot);
    }

    Json(response)
}

async fn advance(State(state): State<AppState>) -> Result<Json<BoardView>, AppError> {
    let mut session = state.session().write().await;
    session.match_advance(now_secs())?;
    Ok(Json(board_view(&session, now_secs())))
}

async fn reset_cleared(State(state): State<AppState>) -> Json<BoardView> {
    let mut session = state.session().write().await;
    session.match_reset_cleared();
    Json(board_view(&session, now_secs()))
}

#[derive(Debug, Serialize)]
struct CalendarResponse {
    registered: bool,
}

/// Register the cleared round on the calendar webhook; original event
/// format (clear time + attempt count).
async fn register_calendar(
    State(state): State<AppState>,
) -> Result<Json<CalendarResponse>, AppError> {
    let Some(calendar) = state.calendar() else {
        return Err(AppError::bad_request("未配置日历 Webhook（CALENDAR_URL）"));
    };

    let (finished, elapsed, attempts) = {
        let session = state.session().read().await;
        let matching = &session.matching;
        (matching.finished, matching.elapsed_seconds, matching.attempts)
    };
    if !finished {
        return Err(AppError::bad_request("本局尚未通关，无法登记日历事件"));
    }

    let description = format!("クリアタイム: {elapsed:.1}秒 / 試行回数: {attempts}回");
    let registered = calendar
        .register("📚 学習完了（マッチングゲーム）", &description)
        .await;
    if !registered {
        return Err(AppError::external_service("日历事件注册失败，请稍后重试"));
    }
    Ok(Json(CalendarResponse { registered: true }))
}
