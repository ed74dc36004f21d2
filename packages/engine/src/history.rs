//! 学习履历账本
//!
//! 按时间顺序追加的作答记录。记录一旦写入不再修改，只支持整体清空。
//! 熟练度（记住/没记住/未知）由「最近一次记录优先」规则推导，是全局
//! 过滤与配色的唯一判定依据。

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{HistoryRecord, Mastery};

/// JST (+09:00) — record timestamps follow the original app's locale.
pub fn jst_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(9 * 3600).expect("fixed +09:00 offset");
    Utc::now().with_timezone(&offset)
}

/// Aggregate statistics over the whole ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Total attempts
    pub total: usize,
    /// Correct attempts
    pub correct: usize,
    /// Wrong attempts
    pub wrong: usize,
    /// Accuracy in percent (0-100), 0 when empty
    pub accuracy: u32,
}

/// Append-only log of attempt outcomes, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryLedger {
    records: Vec<HistoryRecord>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the ledger from a persisted sequence (oldest first).
    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append one attempt outcome.
    pub fn record(&mut self, word: &str, correct: bool, now: DateTime<FixedOffset>) {
        self.records.push(HistoryRecord {
            word: word.to_string(),
            correct,
            timestamp: now.to_rfc3339(),
        });
    }

    /// Mastery status for one word: most recent matching record wins,
    /// no record at all means [`Mastery::Unknown`].
    pub fn mastery(&self, word: &str) -> Mastery {
        for rec in self.records.iter().rev() {
            if rec.word == word {
                return if rec.correct {
                    Mastery::Correct
                } else {
                    Mastery::Wrong
                };
            }
        }
        Mastery::Unknown
    }

    pub fn stats(&self) -> LedgerStats {
        let total = self.records.len();
        let correct = self.records.iter().filter(|r| r.correct).count();
        let wrong = total - correct;
        let accuracy = if total > 0 {
            (correct * 100 / total) as u32
        } else {
            0
        };
        LedgerStats {
            total,
            correct,
            wrong,
            accuracy,
        }
    }

    /// Most recent `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&HistoryRecord> {
        self.records.iter().rev().take(limit).collect()
    }

    /// Bulk clear. The only way records are ever removed.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
