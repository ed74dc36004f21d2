//! 神经衰弱（配对游戏）引擎
//!
//! 卡片状态机: 隐藏 → 翻开 → 配对成功（终态），或翻开 → 隐藏（配对
//! 失败回滚）。局状态: 发牌 → 进行中 → 通关（终态，直到下一局）。
//!
//! 同一会话内已通关的词条记入 `cleared_pair_keys`，连续开局时避免重复
//! 出题；该集合只能显式重置。

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::history::HistoryLedger;
use crate::types::VocabItem;

/// Which face of the pair a card shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardSide {
    Front,
    Back,
}

/// One card on the board. Two cards share a `pair_key` (= item front).
#[derive(Clone, Debug, Serialize)]
pub struct MatchCard {
    pub id: String,
    pub text: String,
    pub pair_key: String,
    pub side: CardSide,
}

/// Result of one `click` transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Index already matched / already revealed / out of bounds
    Ignored,
    /// First card of a comparison revealed
    FirstRevealed,
    /// Second card completed a pair
    Matched { pair_key: String, round_cleared: bool },
    /// Second card did not match; both rolled back to hidden
    Mismatched,
}

/// Matching game state. `cleared_pair_keys` survives rounds and epoch
/// resets within one session; everything else is per-round.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchState {
    pub cards: Vec<MatchCard>,
    /// Face-up flags, indexed like `cards`
    pub revealed: Vec<bool>,
    pub matched: BTreeSet<usize>,
    pub first_selection: Option<usize>,
    /// Comparisons made (second clicks only)
    pub attempts: u32,
    /// Round start, seconds since the Unix epoch
    start_time: Option<f64>,
    pub finished: bool,
    /// Frozen at completion
    pub elapsed_seconds: f64,
    /// Pair keys cleared in previous rounds of this session
    pub cleared_pair_keys: BTreeSet<String>,
}

impl MatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deal a new round of `pair_count` pairs drawn from the deck items
    /// not yet cleared this session.
    ///
    /// The two failure modes are distinguished so the caller can suggest
    /// the right remedy: reset the repeat-avoidance history, or loosen the
    /// deck filter.
    pub fn init_round<R: Rng>(
        &mut self,
        deck: &[VocabItem],
        pair_count: usize,
        rng: &mut R,
        now: f64,
    ) -> EngineResult<()> {
        let candidates: Vec<&VocabItem> = deck
            .iter()
            .filter(|item| !self.cleared_pair_keys.contains(&item.front))
            .collect();

        if candidates.len() < pair_count {
            if deck.len() >= pair_count {
                return Err(EngineError::InsufficientUnseenPairs {
                    remaining: candidates.len(),
                    required: pair_count,
                });
            }
            return Err(EngineError::InsufficientPairs {
                available: deck.len(),
                required: pair_count,
            });
        }

        let mut cards: Vec<MatchCard> = Vec::with_capacity(pair_count * 2);
        for item in candidates.choose_multiple(rng, pair_count) {
            cards.push(MatchCard {
                id: format!("f_{}", item.front),
                text: item.front.clone(),
                pair_key: item.front.clone(),
                side: CardSide::Front,
            });
            cards.push(MatchCard {
                id: format!("b_{}", item.front),
                text: item.back.clone(),
                pair_key: item.front.clone(),
                side: CardSide::Back,
            });
        }
        cards.shuffle(rng);

        self.revealed = vec![false; cards.len()];
        self.cards = cards;
        self.matched = BTreeSet::new();
        self.first_selection = None;
        self.attempts = 0;
        self.start_time = Some(now);
        self.finished = false;
        self.elapsed_seconds = 0.0;
        Ok(())
    }

    /// Reveal/compare transition for a card click.
    ///
    /// Clicks on matched or already-revealed cards are ignored without any
    /// state change. Only second clicks count as attempts.
    pub fn click(
        &mut self,
        index: usize,
        ledger: &mut HistoryLedger,
        ts: DateTime<FixedOffset>,
        now: f64,
    ) -> ClickOutcome {
        if index >= self.cards.len() || self.matched.contains(&index) || self.revealed[index] {
            return ClickOutcome::Ignored;
        }

        let Some(first_idx) = self.first_selection else {
            self.revealed[index] = true;
            self.first_selection = Some(index);
            return ClickOutcome::FirstRevealed;
        };

        self.revealed[index] = true;
        self.attempts += 1;
        self.first_selection = None;

        let first = &self.cards[first_idx];
        let second = &self.cards[index];

        if first.pair_key == second.pair_key && first.side != second.side {
            let pair_key = first.pair_key.clone();
            self.matched.insert(first_idx);
            self.matched.insert(index);
            ledger.record(&pair_key, true, ts);

            let round_cleared = self.matched.len() == self.cards.len();
            if round_cleared {
                self.finished = true;
                self.elapsed_seconds = self.start_time.map_or(0.0, |start| now - start);
            }
            return ClickOutcome::Matched {
                pair_key,
                round_cleared,
            };
        }

        // Mismatch: roll both back to hidden. A same-key mismatch cannot
        // occur (both cards of a pair differ in side, and a card cannot be
        // compared with itself), so the two-record branch always sees two
        // distinct pair keys.
        let first_key = first.pair_key.clone();
        let second_key = second.pair_key.clone();
        self.revealed[first_idx] = false;
        self.revealed[index] = false;
        if first_key != second_key {
            ledger.record(&first_key, false, ts);
            ledger.record(&second_key, false, ts);
        }
        ClickOutcome::Mismatched
    }

    /// Running elapsed time for an unfinished round.
    pub fn elapsed(&self, now: f64) -> f64 {
        if self.finished {
            self.elapsed_seconds
        } else {
            self.start_time.map_or(0.0, |start| now - start)
        }
    }

    /// Remember the just-cleared pairs and deal the next round.
    ///
    /// Pairs count as cleared only when the round actually finished; a
    /// mid-round advance re-deals without touching `cleared_pair_keys`.
    pub fn advance_round<R: Rng>(
        &mut self,
        deck: &[VocabItem],
        pair_count: usize,
        rng: &mut R,
        now: f64,
    ) -> EngineResult<()> {
        if self.finished {
            let cleared: Vec<String> = self.cards.iter().map(|c| c.pair_key.clone()).collect();
            self.cleared_pair_keys.extend(cleared);
        }
        self.init_round(deck, pair_count, rng, now)
    }

    /// Forget which pairs were cleared this session.
    pub fn reset_cleared(&mut self) {
        self.cleared_pair_keys.clear();
    }

    /// Epoch invalidation: drop the board but keep the repeat-avoidance
    /// history, matching the original's settings-change behavior.
    pub fn reset_round(&mut self) {
        let cleared = std::mem::take(&mut self.cleared_pair_keys);
        *self = Self {
            cleared_pair_keys: cleared,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::jst_now;
    use crate::store::sample_items;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    fn partner_of(state: &MatchState, idx: usize) -> usize {
        let card = &state.cards[idx];
        state
            .cards
            .iter()
            .position(|c| c.pair_key == card.pair_key && c.side != card.side)
            .unwrap()
    }

    fn mismatching_of(state: &MatchState, idx: usize) -> usize {
        let card = &state.cards[idx];
        state
            .cards
            .iter()
            .position(|c| c.pair_key != card.pair_key)
            .unwrap()
    }

    #[test]
    fn test_init_round_deals_hidden_board() {
        let deck = sample_items();
        let mut state = MatchState::new();
        state.init_round(&deck, 4, &mut rng(), 1000.0).unwrap();

        assert_eq!(state.cards.len(), 8);
        assert!(state.revealed.iter().all(|r| !r));
        assert!(state.matched.is_empty());
        assert_eq!(state.attempts, 0);
        assert!(!state.finished);

        // every pair key appears once per side
        for card in &state.cards {
            let partner = state
                .cards
                .iter()
                .filter(|c| c.pair_key == card.pair_key && c.side != card.side)
                .count();
            assert_eq!(partner, 1);
        }
    }

    #[test]
    fn test_deck_too_small_vs_unseen_exhausted() {
        let deck = sample_items()[..3].to_vec();
        let mut state = MatchState::new();
        let err = state.init_round(&deck, 4, &mut rng(), 0.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientPairs {
                available: 3,
                required: 4
            }
        );

        let deck = sample_items()[..5].to_vec();
        let mut state = MatchState::new();
        for item in &deck[..2] {
            state.cleared_pair_keys.insert(item.front.clone());
        }
        let err = state.init_round(&deck, 4, &mut rng(), 0.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientUnseenPairs {
                remaining: 3,
                required: 4
            }
        );
    }

    #[test]
    fn test_first_click_reveals_only_that_card() {
        let deck = sample_items();
        let mut state = MatchState::new();
        let mut ledger = HistoryLedger::new();
        state.init_round(&deck, 4, &mut rng(), 0.0).unwrap();

        let outcome = state.click(0, &mut ledger, jst_now(), 1.0);
        assert_eq!(outcome, ClickOutcome::FirstRevealed);
        assert!(state.revealed[0]);
        assert_eq!(state.revealed.iter().filter(|r| **r).count(), 1);
        assert_eq!(state.attempts, 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_mismatch_rolls_both_back_and_records_two_misses() {
        let deck = sample_items();
        let mut state = MatchState::new();
        let mut ledger = HistoryLedger::new();
        state.init_round(&deck, 4, &mut rng(), 0.0).unwrap();

        let other = mismatching_of(&state, 0);
        state.click(0, &mut ledger, jst_now(), 1.0);
        let outcome = state.click(other, &mut ledger, jst_now(), 2.0);

        assert_eq!(outcome, ClickOutcome::Mismatched);
        assert!(!state.revealed[0]);
        assert!(!state.revealed[other]);
        assert_eq!(state.attempts, 1);
        assert_eq!(state.first_selection, None);
        assert_eq!(ledger.len(), 2);
        assert!(ledger.records().iter().all(|r| !r.correct));
    }

    #[test]
    fn test_match_marks_both_and_records_one_hit() {
        let deck = sample_items();
        let mut state = MatchState::new();
        let mut ledger = HistoryLedger::new();
        state.init_round(&deck, 4, &mut rng(), 0.0).unwrap();

        let partner = partner_of(&state, 0);
        state.click(0, &mut ledger, jst_now(), 1.0);
        let outcome = state.click(partner, &mut ledger, jst_now(), 2.0);

        let pair_key = state.cards[0].pair_key.clone();
        assert_eq!(
            outcome,
            ClickOutcome::Matched {
                pair_key: pair_key.clone(),
                round_cleared: false
            }
        );
        assert!(state.matched.contains(&0));
        assert!(state.matched.contains(&partner));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.records()[0].word, pair_key);
        assert!(ledger.records()[0].correct);
    }

    #[test]
    fn test_click_idempotent_on_matched_and_revealed() {
        let deck = sample_items();
        let mut state = MatchState::new();
        let mut ledger = HistoryLedger::new();
        state.init_round(&deck, 4, &mut rng(), 0.0).unwrap();

        state.click(0, &mut ledger, jst_now(), 1.0);
        // second click on the same revealed card
        assert_eq!(state.click(0, &mut ledger, jst_now(), 1.0), ClickOutcome::Ignored);
        assert_eq!(state.attempts, 0);
        assert_eq!(state.first_selection, Some(0));

        let partner = partner_of(&state, 0);
        state.click(partner, &mut ledger, jst_now(), 2.0);
        // clicks on matched cards are ignored
        assert_eq!(state.click(0, &mut ledger, jst_now(), 3.0), ClickOutcome::Ignored);
        assert_eq!(state.click(partner, &mut ledger, jst_now(), 3.0), ClickOutcome::Ignored);
        assert_eq!(state.attempts, 1);
        assert_eq!(ledger.len(), 1);

        // out-of-bounds index is ignored too
        assert_eq!(state.click(999, &mut ledger, jst_now(), 3.0), ClickOutcome::Ignored);
    }

    #[test]
    fn test_completion_after_exactly_pair_count_matches() {
        let deck = sample_items();
        let mut state = MatchState::new();
        let mut ledger = HistoryLedger::new();
        state.init_round(&deck, 3, &mut rng(), 100.0).unwrap();

        let mut cleared = false;
        for idx in 0..state.cards.len() {
            if state.matched.contains(&idx) {
                continue;
            }
            let partner = partner_of(&state, idx);
            state.click(idx, &mut ledger, jst_now(), 110.0);
            if let ClickOutcome::Matched { round_cleared, .. } =
                state.click(partner, &mut ledger, jst_now(), 112.5)
            {
                cleared = round_cleared;
            }
        }

        assert!(cleared);
        assert!(state.finished);
        assert_eq!(state.attempts, 3);
        assert!((state.elapsed_seconds - 12.5).abs() < 1e-9);
        assert!((state.elapsed(999.0) - 12.5).abs() < 1e-9);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_advance_round_avoids_cleared_pairs() {
        let deck = sample_items();
        let mut state = MatchState::new();
        let mut ledger = HistoryLedger::new();
        state.init_round(&deck, 4, &mut rng(), 0.0).unwrap();

        // clear the whole round
        for idx in 0..state.cards.len() {
            if state.matched.contains(&idx) {
                continue;
            }
            let partner = partner_of(&state, idx);
            state.click(idx, &mut ledger, jst_now(), 1.0);
            state.click(partner, &mut ledger, jst_now(), 2.0);
        }
        let first_round: BTreeSet<String> =
            state.cards.iter().map(|c| c.pair_key.clone()).collect();

        state.advance_round(&deck, 4, &mut rng(), 10.0).unwrap();
        assert_eq!(state.cleared_pair_keys, first_round);
        for card in &state.cards {
            assert!(!first_round.contains(&card.pair_key));
        }
        assert!(!state.finished);
        assert_eq!(state.attempts, 0);
    }

    #[test]
    fn test_mid_round_advance_does_not_mark_pairs_cleared() {
        let deck = sample_items();
        let mut state = MatchState::new();
        let mut ledger = HistoryLedger::new();
        state.init_round(&deck, 4, &mut rng(), 0.0).unwrap();

        // match one pair, leave the round unfinished
        let partner = partner_of(&state, 0);
        state.click(0, &mut ledger, jst_now(), 1.0);
        state.click(partner, &mut ledger, jst_now(), 2.0);
        assert!(!state.finished);

        state.advance_round(&deck, 4, &mut rng(), 10.0).unwrap();
        assert!(state.cleared_pair_keys.is_empty());
        assert_eq!(state.attempts, 0);
        assert!(state.matched.is_empty());
    }

    #[test]
    fn test_reset_cleared_forgets_history_only() {
        let deck = sample_items();
        let mut state = MatchState::new();
        state.init_round(&deck, 4, &mut rng(), 0.0).unwrap();
        state.cleared_pair_keys.insert("Apple".into());

        let cards_before = state.cards.len();
        state.reset_cleared();
        assert!(state.cleared_pair_keys.is_empty());
        assert_eq!(state.cards.len(), cards_before);
    }

    #[test]
    fn test_reset_round_keeps_cleared_pairs() {
        let deck = sample_items();
        let mut state = MatchState::new();
        state.init_round(&deck, 4, &mut rng(), 0.0).unwrap();
        state.cleared_pair_keys.insert("Apple".into());

        state.reset_round();
        assert!(state.cards.is_empty());
        assert!(!state.finished);
        assert!(state.cleared_pair_keys.contains("Apple"));
    }
}
