//! 牌组筛选与会话缓存
//!
//! 按设置（牌组标识 / 出题数上限 / 排除已记住）从词库生成本次会话的
//! 牌组。键不变时牌组顺序保持逐位一致；键变化视为跨纪元，洗牌重建并
//! 通知调用方使所有引擎状态失效。

use rand::seq::SliceRandom;
use rand::Rng;

use crate::history::HistoryLedger;
use crate::types::{DeckLimit, Mastery, VocabItem};

/// Typed cache key for one deck-selector epoch.
///
/// Replaces the original's concatenated key string so that distinct
/// settings can never collide through naive stringification.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeckKey {
    /// Resolved deck locator (preset name, URL, or "sample")
    pub deck_id: String,
    pub limit: DeckLimit,
    pub filter_mastered: bool,
    /// Length of the unfiltered source, so a source refresh reshuffles
    pub source_len: usize,
}

/// Result of one `select` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOutcome {
    /// True when the cache key changed and dependent engine state is stale
    pub epoch_changed: bool,
    pub deck_len: usize,
}

/// Memoizing deck selector. Owns the active session deck.
#[derive(Debug, Clone, Default)]
pub struct DeckSelector {
    key: Option<DeckKey>,
    deck: Vec<VocabItem>,
}

impl DeckSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active session deck. Empty is a valid "nothing to study" state.
    pub fn deck(&self) -> &[VocabItem] {
        &self.deck
    }

    pub fn key(&self) -> Option<&DeckKey> {
        self.key.as_ref()
    }

    /// Drop the memoized deck so the next `select` reshuffles.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.deck.clear();
    }

    /// Apply mastery filter, shuffle, and truncate — memoized per key.
    ///
    /// With an unchanged key the cached ordering is returned untouched.
    /// A changed key rebuilds the deck and reports `epoch_changed`, which
    /// obliges the caller to reset every engine's progress.
    pub fn select<R: Rng>(
        &mut self,
        items: &[VocabItem],
        limit: DeckLimit,
        filter_mastered: bool,
        deck_id: &str,
        ledger: &HistoryLedger,
        rng: &mut R,
    ) -> SelectOutcome {
        let key = DeckKey {
            deck_id: deck_id.to_string(),
            limit,
            filter_mastered,
            source_len: items.len(),
        };

        if self.key.as_ref() == Some(&key) {
            return SelectOutcome {
                epoch_changed: false,
                deck_len: self.deck.len(),
            };
        }

        let mut filtered: Vec<VocabItem> = if filter_mastered {
            items
                .iter()
                .filter(|item| ledger.mastery(&item.front) != Mastery::Correct)
                .cloned()
                .collect()
        } else {
            items.to_vec()
        };

        filtered.shuffle(rng);
        if let DeckLimit::Count(limit) = limit {
            filtered.truncate(limit);
        }

        self.deck = filtered;
        self.key = Some(key);

        SelectOutcome {
            epoch_changed: true,
            deck_len: self.deck.len(),
        }
    }
}
