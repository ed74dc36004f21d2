//! Learning-history endpoints: the ledger panel, clearing, and the
//! best-effort calendar registration of a finished study block.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use tango_engine::{HistoryRecord, LedgerStats};

use crate::response::AppError;
use crate::state::AppState;

const DEFAULT_RECENT_LIMIT: usize = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).delete(clear))
        .route("/calendar", post(register_calendar))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HistoryView {
    stats: LedgerStats,
    /// Newest first
    recent: Vec<HistoryRecord>,
}

#[derive(Debug, Serialize)]
struct ClearResponse {
    cleared: bool,
}

#[derive(Debug, Serialize)]
struct CalendarResponse {
    registered: bool,
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<HistoryView> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let session = state.session().read().await;
    let view = HistoryView {
        stats: session.ledger.stats(),
        recent: session.ledger.recent(limit).into_iter().cloned().collect(),
    };
    Json(view)
}

async fn clear(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut session = state.session().write().await;
    session.clear_history();
    let snapshot = session.ledger.records().to_vec();
    drop(session);
    state.history().persist(snapshot);
    Json(ClearResponse { cleared: true })
}

/// Push a "study block finished" event to the calendar webhook. The stats
/// snapshot goes into the event description.
async fn register_calendar(
    State(state): State<AppState>,
) -> Result<Json<CalendarResponse>, AppError> {
    let Some(calendar) = state.calendar() else {
        return Err(AppError::bad_request("未配置日历 Webhook（CALENDAR_URL）"));
    };

    let stats = {
        let session = state.session().read().await;
        session.ledger.stats()
    };
    let description = format!(
        "合計{}問 / 正解{}問 / 正答率{}%",
        stats.total, stats.correct, stats.accuracy
    );

    let registered = calendar.register("📚 学習完了", &description).await;
    if !registered {
        return Err(AppError::external_service("日历事件注册失败，请稍后重试"));
    }
    Ok(Json(CalendarResponse { registered: true }))
}
