use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;

use tango_engine::TrainerSession;

use crate::services::{CalendarClient, DeckSource, HistoryWriter};

/// Shared application state. One trainer session per process — this is a
/// single-user application, and every request is one atomic transition on
/// the session behind the lock.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    session: RwLock<TrainerSession>,
    deck_source: DeckSource,
    history: HistoryWriter,
    calendar: Option<CalendarClient>,
    started_at: Instant,
}

impl AppState {
    pub fn new(
        session: TrainerSession,
        deck_source: DeckSource,
        history: HistoryWriter,
        calendar: Option<CalendarClient>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                session: RwLock::new(session),
                deck_source,
                history,
                calendar,
                started_at: Instant::now(),
            }),
        }
    }

    pub fn session(&self) -> &RwLock<TrainerSession> {
        &self.inner.session
    }

    pub fn deck_source(&self) -> &DeckSource {
        &self.inner.deck_source
    }

    pub fn history(&self) -> &HistoryWriter {
        &self.inner.history
    }

    pub fn calendar(&self) -> Option<&CalendarClient> {
        self.inner.calendar.as_ref()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }
}

/// Wall-clock seconds for match-round timing.
pub fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
