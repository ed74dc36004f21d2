//! 四选一测验引擎
//!
//! 每个纪元只灌注一次题池：把牌组完整复制并洗牌后按 FIFO 逐题弹出，
//! 一轮内每条词条恰好出现一次；弹空即进入「全部完成」画面，只有显式
//! 重新开始才会清空完成标记并重灌题池。
//!
//! 误答选项优先使用词条自带的固定误答（最多 3 个），不足时从牌组其余
//! 词条中无放回均匀抽样补齐。抽到的误答文本与正确答案相同时仍然保留
//! （只对固定误答去重，不对正确答案去重）——这是沿袭原实现的既定行为，
//! 不是待修的 bug。

use std::collections::VecDeque;

use chrono::{DateTime, FixedOffset};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::history::HistoryLedger;
use crate::types::{VocabItem, MAX_FIXED_WRONG_CHOICES, MIN_QUIZ_DECK};

/// Quiz session state. One instance per deck-key epoch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuizState {
    /// Shuffled question queue, consumed front-to-back. `None` means
    /// "not yet dealt for this epoch" (distinct from dealt-and-empty).
    #[serde(skip)]
    pool: Option<VecDeque<VocabItem>>,
    /// Question currently on screen
    pub current: Option<VocabItem>,
    /// Display-ordered options for the current question (normally 4)
    pub options: Vec<String>,
    pub answered: bool,
    pub was_correct: bool,
    pub score: u32,
    pub total_answered: u32,
    /// Set when the pool has been fully consumed; cleared by `restart`
    pub finished: bool,
}

impl QuizState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of questions still waiting in the pool.
    pub fn remaining(&self) -> usize {
        self.pool.as_ref().map_or(0, VecDeque::len)
    }

    /// Deal the next question from the pool.
    ///
    /// Fails without mutating state when the deck cannot support four
    /// options. Popping an exhausted pool flips `finished` and clears the
    /// current question instead of producing one.
    pub fn generate_question<R: Rng>(
        &mut self,
        deck: &[VocabItem],
        rng: &mut R,
    ) -> EngineResult<()> {
        if deck.len() < MIN_QUIZ_DECK {
            return Err(EngineError::InsufficientData(deck.len()));
        }

        if self.pool.is_none() && !self.finished {
            let mut fresh: Vec<VocabItem> = deck.to_vec();
            fresh.shuffle(rng);
            self.pool = Some(fresh.into());
        }

        let item = match self.pool.as_mut().and_then(VecDeque::pop_front) {
            Some(item) => item,
            None => {
                self.finished = true;
                self.current = None;
                self.options.clear();
                self.answered = false;
                self.was_correct = false;
                return Ok(());
            }
        };

        self.options = build_options(&item, deck, rng);
        self.current = Some(item);
        self.answered = false;
        self.was_correct = false;
        Ok(())
    }

    /// Score the chosen option and append one history record.
    ///
    /// Returns `None` (a guarded no-op) when there is no open question or
    /// the question was already answered — scoring never re-enters.
    pub fn submit_answer(
        &mut self,
        option: &str,
        ledger: &mut HistoryLedger,
        now: DateTime<FixedOffset>,
    ) -> Option<bool> {
        if self.answered {
            return None;
        }
        let current = self.current.as_ref()?;

        let correct = option == current.back;
        self.answered = true;
        self.was_correct = correct;
        self.total_answered += 1;
        if correct {
            self.score += 1;
        }
        ledger.record(&current.front, correct, now);
        Some(correct)
    }

    /// Explicit restart after a finished pass: zero the score, null the
    /// pool, and let the next `generate_question` deal a fresh full pass.
    pub fn restart(&mut self) {
        self.finished = false;
        self.score = 0;
        self.total_answered = 0;
        self.pool = None;
        self.current = None;
        self.options.clear();
        self.answered = false;
        self.was_correct = false;
    }

    /// Epoch invalidation: the deck changed, every field is stale.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Build the 4-option list: correct answer + curated/sampled distractors,
/// shuffled into display order.
fn build_options<R: Rng>(item: &VocabItem, deck: &[VocabItem], rng: &mut R) -> Vec<String> {
    let fixed = &item.wrong_choices;

    let distractors: Vec<String> = if fixed.len() >= MAX_FIXED_WRONG_CHOICES {
        fixed[..MAX_FIXED_WRONG_CHOICES].to_vec()
    } else {
        let candidates: Vec<&VocabItem> = deck
            .iter()
            .filter(|d| d.front != item.front && !fixed.contains(&d.back))
            .collect();
        let needed = MAX_FIXED_WRONG_CHOICES - fixed.len();
        // choose_multiple clips to the candidate count; under-filled
        // option sets are accepted
        let sampled = candidates.choose_multiple(rng, needed);
        fixed
            .iter()
            .cloned()
            .chain(sampled.map(|d| d.back.clone()))
            .collect()
    };

    let mut options = Vec::with_capacity(1 + distractors.len());
    options.push(item.back.clone());
    options.extend(distractors);
    options.shuffle(rng);
    options
}
