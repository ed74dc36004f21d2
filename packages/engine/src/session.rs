//! 会话组合
//!
//! 把词库、履历账本、牌组选择器和三个模式引擎组合成一个显式的会话状态
//! 值，由宿主应用层持有。每次用户交互都是一次原子状态迁移：引擎本身不
//! 持有任何全局可变状态。

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::deck::{DeckSelector, SelectOutcome};
use crate::error::EngineResult;
use crate::flashcard::FlashcardState;
use crate::history::{jst_now, HistoryLedger};
use crate::matching::{ClickOutcome, MatchState};
use crate::quiz::QuizState;
use crate::store::VocabularyStore;
use crate::types::{DeckLimit, VocabItem};

/// The configuration surface shared by all modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Resolved deck locator (preset name, URL, or "sample")
    pub deck_id: String,
    pub limit: DeckLimit,
    /// Drop items whose mastery status is `correct`
    pub filter_mastered: bool,
    /// Matching-game pairs per round
    pub pair_count: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            deck_id: "sample".to_string(),
            limit: DeckLimit::Count(10),
            filter_mastered: false,
            pair_count: 8,
        }
    }
}

/// One user's trainer session: a single composed state value.
#[derive(Debug, Clone)]
pub struct TrainerSession {
    store: VocabularyStore,
    pub ledger: HistoryLedger,
    selector: DeckSelector,
    pub quiz: QuizState,
    pub matching: MatchState,
    pub flashcards: FlashcardState,
    settings: SessionSettings,
    rng: ChaCha8Rng,
}

impl TrainerSession {
    pub fn new(store: VocabularyStore, ledger: HistoryLedger) -> Self {
        Self::with_seed(store, ledger, rand::random())
    }

    /// Deterministic session for tests and reproducible runs.
    pub fn with_seed(store: VocabularyStore, ledger: HistoryLedger, seed: u64) -> Self {
        Self {
            store,
            ledger,
            selector: DeckSelector::new(),
            quiz: QuizState::new(),
            matching: MatchState::new(),
            flashcards: FlashcardState::new(),
            settings: SessionSettings::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn store(&self) -> &VocabularyStore {
        &self.store
    }

    /// Swap in a freshly loaded vocabulary. Deck-key epoch handling happens
    /// on the next `apply_settings` (the key includes the source length).
    pub fn replace_store(&mut self, store: VocabularyStore) {
        self.store = store;
    }

    /// The active session deck.
    pub fn deck(&self) -> &[VocabItem] {
        self.selector.deck()
    }

    /// Apply settings and (when the deck key changed) reset all engines'
    /// progress — their cached positions are meaningless in the new epoch.
    pub fn apply_settings(&mut self, settings: SessionSettings) -> SelectOutcome {
        self.settings = settings;
        let outcome = self.selector.select(
            self.store.items(),
            self.settings.limit,
            self.settings.filter_mastered,
            &self.settings.deck_id,
            &self.ledger,
            &mut self.rng,
        );
        if outcome.epoch_changed {
            self.quiz.reset();
            self.matching.reset_round();
            self.flashcards.reset();
        }
        outcome
    }

    // ==================== Quiz ====================

    pub fn quiz_next(&mut self) -> EngineResult<()> {
        self.quiz.generate_question(self.selector.deck(), &mut self.rng)
    }

    pub fn quiz_answer(&mut self, option: &str) -> Option<bool> {
        self.quiz.submit_answer(option, &mut self.ledger, jst_now())
    }

    pub fn quiz_restart(&mut self) {
        self.quiz.restart();
    }

    // ==================== Matching ====================

    pub fn match_init(&mut self, now: f64) -> EngineResult<()> {
        self.matching.init_round(
            self.selector.deck(),
            self.settings.pair_count,
            &mut self.rng,
            now,
        )
    }

    pub fn match_click(&mut self, index: usize, now: f64) -> ClickOutcome {
        self.matching.click(index, &mut self.ledger, jst_now(), now)
    }

    pub fn match_advance(&mut self, now: f64) -> EngineResult<()> {
        self.matching.advance_round(
            self.selector.deck(),
            self.settings.pair_count,
            &mut self.rng,
            now,
        )
    }

    pub fn match_reset_cleared(&mut self) {
        self.matching.reset_cleared();
    }

    // ==================== Flashcards ====================

    /// Current card, dealing the shuffled order lazily.
    pub fn flash_current(&mut self) -> Option<&VocabItem> {
        self.flash_ensure_order();
        self.flashcards.current(self.selector.deck())
    }

    pub fn flash_flip(&mut self) {
        self.flash_ensure_order();
        self.flashcards.flip();
    }

    pub fn flash_mark(&mut self, known: bool) {
        self.flash_ensure_order();
        if known {
            self.flashcards
                .mark_known(self.selector.deck(), &mut self.ledger, jst_now());
        } else {
            self.flashcards.mark_unknown();
        }
    }

    /// Every flashcard transition deals the order first; a mark or flip
    /// may be the epoch's first interaction.
    fn flash_ensure_order(&mut self) {
        let deck_len = self.selector.deck().len();
        self.flashcards.ensure_order(deck_len, &mut self.rng);
    }

    pub fn flash_restart(&mut self) {
        self.flashcards.restart(&mut self.rng);
    }

    // ==================== History ====================

    pub fn clear_history(&mut self) {
        self.ledger.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sample_items;
    use crate::types::Mastery;

    fn session() -> TrainerSession {
        TrainerSession::with_seed(VocabularyStore::sample(), HistoryLedger::new(), 1)
    }

    #[test]
    fn test_end_to_end_quiz_scenario() {
        // 16 sample pairs, no filter, no limit
        let mut session = session();
        let outcome = session.apply_settings(SessionSettings {
            deck_id: "sample".into(),
            limit: DeckLimit::All,
            filter_mastered: false,
            pair_count: 8,
        });
        assert!(outcome.epoch_changed);
        assert_eq!(session.deck().len(), 16);

        session.quiz_next().unwrap();
        let current = session.quiz.current.clone().unwrap();
        assert_eq!(session.quiz.options.len(), 4);
        assert!(session.quiz.options.contains(&current.back));

        let answer = current.back.clone();
        assert_eq!(session.quiz_answer(&answer), Some(true));
        assert!(session.quiz.was_correct);
        assert_eq!(session.quiz.score, 1);
        assert_eq!(session.quiz.total_answered, 1);
        assert_eq!(session.ledger.len(), 1);
        assert!(session.ledger.records()[0].correct);
        assert_eq!(session.ledger.mastery(&current.front), Mastery::Correct);
    }

    #[test]
    fn test_settings_change_resets_engine_progress() {
        let mut session = session();
        session.apply_settings(SessionSettings {
            limit: DeckLimit::All,
            ..SessionSettings::default()
        });

        session.quiz_next().unwrap();
        session.match_init(0.0).unwrap();
        session.flash_current();
        session.flash_mark(false);
        assert_eq!(session.flashcards.index, 1);

        let outcome = session.apply_settings(SessionSettings {
            limit: DeckLimit::Count(10),
            ..SessionSettings::default()
        });
        assert!(outcome.epoch_changed);
        assert!(session.quiz.current.is_none());
        assert_eq!(session.quiz.total_answered, 0);
        assert!(session.matching.cards.is_empty());
        assert_eq!(session.flashcards.index, 0);
    }

    #[test]
    fn test_flash_mark_as_first_interaction_records_and_advances() {
        let mut session = session();
        session.apply_settings(SessionSettings {
            limit: DeckLimit::All,
            ..SessionSettings::default()
        });

        // no flash_current beforehand: the mark itself deals the order
        session.flash_mark(true);
        assert_eq!(session.flashcards.index, 1);
        assert_eq!(session.ledger.len(), 1);
        assert!(session.ledger.records()[0].correct);

        session.flash_mark(false);
        assert_eq!(session.flashcards.index, 2);
        assert_eq!(session.ledger.len(), 1);
    }

    #[test]
    fn test_flash_flip_as_first_interaction_shows_a_card() {
        let mut session = session();
        session.apply_settings(SessionSettings {
            limit: DeckLimit::All,
            ..SessionSettings::default()
        });

        session.flash_flip();
        assert!(session.flashcards.flipped);
        assert!(session.flash_current().is_some());
        // the flip landed on the dealt order, not a pre-deal ghost state
        assert!(session.flashcards.flipped);
    }

    #[test]
    fn test_unchanged_settings_keep_progress() {
        let mut session = session();
        let settings = SessionSettings::default();
        session.apply_settings(settings.clone());
        session.quiz_next().unwrap();
        let before = session.quiz.current.clone();

        let outcome = session.apply_settings(settings);
        assert!(!outcome.epoch_changed);
        assert_eq!(session.quiz.current, before);
    }

    #[test]
    fn test_cleared_pairs_survive_epoch_change() {
        let mut session = session();
        session.apply_settings(SessionSettings {
            limit: DeckLimit::All,
            ..SessionSettings::default()
        });
        session.matching.cleared_pair_keys.insert("Apple".into());

        session.apply_settings(SessionSettings {
            limit: DeckLimit::Count(12),
            ..SessionSettings::default()
        });
        assert!(session.matching.cleared_pair_keys.contains("Apple"));
    }

    #[test]
    fn test_filter_mastered_excludes_learned_words() {
        let mut session = session();
        session.apply_settings(SessionSettings {
            limit: DeckLimit::All,
            ..SessionSettings::default()
        });
        // master four words through the quiz
        for _ in 0..4 {
            session.quiz_next().unwrap();
            let back = session.quiz.current.clone().unwrap().back;
            session.quiz_answer(&back);
        }
        let mastered: Vec<String> = sample_items()
            .iter()
            .filter(|i| session.ledger.mastery(&i.front) == Mastery::Correct)
            .map(|i| i.front.clone())
            .collect();
        assert_eq!(mastered.len(), 4);

        session.apply_settings(SessionSettings {
            limit: DeckLimit::All,
            filter_mastered: true,
            ..SessionSettings::default()
        });
        assert_eq!(session.deck().len(), 12);
        for front in mastered {
            assert!(session.deck().iter().all(|i| i.front != front));
        }
    }

    #[test]
    fn test_empty_deck_is_terminal_not_an_error() {
        let mut session = session();
        session.apply_settings(SessionSettings {
            limit: DeckLimit::All,
            ..SessionSettings::default()
        });
        for item in sample_items() {
            session.ledger.record(&item.front, true, jst_now());
        }
        let outcome = session.apply_settings(SessionSettings {
            limit: DeckLimit::All,
            filter_mastered: true,
            ..SessionSettings::default()
        });
        assert_eq!(outcome.deck_len, 0);
        assert!(session.deck().is_empty());
    }
}
