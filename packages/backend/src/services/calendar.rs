//! Calendar collaborator.
//!
//! Best-effort "register completion event" webhook. The core only learns
//! success or failure; a failure is surfaced as a warning and never touches
//! session state.

use chrono::Duration;
use serde::Serialize;

use tango_engine::jst_now;

#[derive(Debug, Serialize)]
struct CalendarEvent<'a> {
    summary: &'a str,
    description: &'a str,
    start: String,
    end: String,
    time_zone: &'static str,
}

#[derive(Clone)]
pub struct CalendarClient {
    client: reqwest::Client,
    webhook: String,
}

impl CalendarClient {
    pub fn new(webhook: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook,
        }
    }

    /// Register a 30-minute completion event starting now (JST).
    pub async fn register(&self, summary: &str, description: &str) -> bool {
        let now = jst_now();
        let event = CalendarEvent {
            summary,
            description,
            start: now.to_rfc3339(),
            end: (now + Duration::minutes(30)).to_rfc3339(),
            time_zone: "Asia/Tokyo",
        };

        let result = self
            .client
            .post(&self.webhook)
            .json(&event)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        match result {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "calendar registration failed");
                false
            }
        }
    }
}
