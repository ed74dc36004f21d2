//! Property tests for the quiz pool and option invariants.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tango_engine::{HistoryLedger, Mastery, QuizState, VocabItem};

fn deck(n: usize) -> Vec<VocabItem> {
    (0..n)
        .map(|i| VocabItem::new(format!("front-{i}"), format!("back-{i}")))
        .collect()
}

proptest! {
    /// Across one full pass, every deck item appears exactly once and the
    /// N+1-th call flips `finished`.
    #[test]
    fn pool_is_consumed_without_repetition(size in 4usize..40, seed in any::<u64>()) {
        let deck = deck(size);
        let mut quiz = QuizState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut seen = Vec::new();

        for _ in 0..size {
            quiz.generate_question(&deck, &mut rng).unwrap();
            prop_assert!(!quiz.finished);
            seen.push(quiz.current.clone().unwrap().front);
        }

        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), size);

        quiz.generate_question(&deck, &mut rng).unwrap();
        prop_assert!(quiz.finished);
        prop_assert!(quiz.current.is_none());
    }

    /// With at least 4 unique-front items, every question carries exactly
    /// 4 options including the correct back at least once.
    #[test]
    fn options_always_hold_four_entries_with_correct_back(
        size in 4usize..40,
        seed in any::<u64>(),
    ) {
        let deck = deck(size);
        let mut quiz = QuizState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for _ in 0..size {
            quiz.generate_question(&deck, &mut rng).unwrap();
            let current = quiz.current.clone().unwrap();
            prop_assert_eq!(quiz.options.len(), 4);
            let hits = quiz.options.iter().filter(|o| **o == current.back).count();
            prop_assert!(hits >= 1);
        }
    }

    /// Scoring never drifts: score <= total_answered, and the ledger grows
    /// by exactly one record per submitted answer with matching mastery.
    #[test]
    fn scoring_and_ledger_stay_consistent(
        size in 4usize..20,
        seed in any::<u64>(),
        answers in prop::collection::vec(any::<bool>(), 1..20),
    ) {
        let deck = deck(size);
        let mut quiz = QuizState::new();
        let mut ledger = HistoryLedger::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for choose_correct in answers {
            quiz.generate_question(&deck, &mut rng).unwrap();
            let Some(current) = quiz.current.clone() else { break };
            let option = if choose_correct {
                current.back.clone()
            } else {
                "absolutely-wrong".to_string()
            };
            let before = ledger.len();
            let result = quiz.submit_answer(&option, &mut ledger, tango_engine::jst_now());
            prop_assert_eq!(result, Some(choose_correct));
            prop_assert_eq!(ledger.len(), before + 1);

            let expected = if choose_correct { Mastery::Correct } else { Mastery::Wrong };
            prop_assert_eq!(ledger.mastery(&current.front), expected);
        }

        prop_assert!(quiz.score <= quiz.total_answered);
        prop_assert_eq!(quiz.total_answered as usize, ledger.len());
    }
}
