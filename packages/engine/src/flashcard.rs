//! 单词卡引擎
//!
//! 在洗乱的索引序列上推进的游标，外加一个翻面标记。「记住了」会追加
//! 一条正确记录再前进，「还没记住」只前进不记录。走到末尾即「全部看完」，
//! 直到显式重新开始（重洗并归零游标）。

use chrono::{DateTime, FixedOffset};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::history::HistoryLedger;
use crate::types::VocabItem;

#[derive(Debug, Clone, Default, Serialize)]
pub struct FlashcardState {
    /// Shuffled permutation of deck indices
    order: Vec<usize>,
    /// Cursor into `order`; == order.len() means "all reviewed"
    pub index: usize,
    /// Whether the back face is showing
    pub flipped: bool,
}

impl FlashcardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build (or rebuild) the shuffled order when the deck size changed.
    pub fn ensure_order<R: Rng>(&mut self, deck_len: usize, rng: &mut R) {
        if self.order.len() != deck_len {
            self.index = 0;
            self.flipped = false;
            let mut order: Vec<usize> = (0..deck_len).collect();
            order.shuffle(rng);
            self.order = order;
        }
    }

    /// The card under the cursor, or `None` once every card was reviewed.
    pub fn current<'a>(&self, deck: &'a [VocabItem]) -> Option<&'a VocabItem> {
        self.order.get(self.index).and_then(|&i| deck.get(i))
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.order.len()
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// "覚えた": record a correct attempt for the current card and advance.
    pub fn mark_known(
        &mut self,
        deck: &[VocabItem],
        ledger: &mut HistoryLedger,
        now: DateTime<FixedOffset>,
    ) {
        if let Some(item) = self.current(deck) {
            ledger.record(&item.front, true, now);
        }
        self.advance();
    }

    /// "まだ": advance without recording anything.
    pub fn mark_unknown(&mut self) {
        self.advance();
    }

    fn advance(&mut self) {
        if self.index < self.order.len() {
            self.index += 1;
        }
        self.flipped = false;
    }

    /// Reshuffle the same order and start over.
    pub fn restart<R: Rng>(&mut self, rng: &mut R) {
        self.index = 0;
        self.flipped = false;
        self.order.shuffle(rng);
    }

    /// Epoch invalidation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
