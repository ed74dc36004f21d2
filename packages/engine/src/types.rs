//! Common Types and Constants
//!
//! Shared data structures used across all engine modules.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Minimum deck size for the four-choice quiz
pub const MIN_QUIZ_DECK: usize = 4;

/// Number of options per quiz question
pub const QUIZ_OPTION_COUNT: usize = 4;

/// Maximum number of curated wrong choices carried by an item
pub const MAX_FIXED_WRONG_CHOICES: usize = 3;

/// Selectable pair counts for the matching game
pub const MATCH_PAIR_CHOICES: [usize; 4] = [3, 4, 6, 8];

/// Header labels dropped from the first row of a deck source (case-insensitive)
pub const HEADER_LABELS: [&str; 4] = ["表", "front", "おもて", "question"];

// ==================== Vocabulary ====================

/// One term/definition pair.
///
/// `front` is the identity key for history and mastery lookups. Uniqueness
/// within a deck is a design invariant the deck author is responsible for;
/// it is not enforced here, and duplicate fronts collapse onto one mastery
/// entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabItem {
    /// Question side (term)
    pub front: String,
    /// Answer side (definition / translation)
    pub back: String,
    /// Curated wrong choices (0-3), used before random distractor sampling
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wrong_choices: Vec<String>,
    /// Optional explanation shown after answering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl VocabItem {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            wrong_choices: Vec::new(),
            explanation: None,
        }
    }
}

// ==================== History ====================

/// One attempt outcome. Append-only; never mutated or removed individually.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Identity key of the item (`VocabItem::front`)
    pub word: String,
    /// Whether the attempt was correct
    pub correct: bool,
    /// RFC 3339 timestamp with explicit offset
    pub timestamp: String,
}

/// Derived mastery status for one word ("last observation wins").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mastery {
    Correct,
    Wrong,
    Unknown,
}

// ==================== Deck selection ====================

/// Per-session item limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeckLimit {
    /// No truncation
    All,
    /// Truncate the shuffled deck to this many items
    Count(usize),
}

impl DeckLimit {
    pub fn from_option(limit: Option<usize>) -> Self {
        match limit {
            Some(n) => DeckLimit::Count(n),
            None => DeckLimit::All,
        }
    }

    pub fn as_option(self) -> Option<usize> {
        match self {
            DeckLimit::All => None,
            DeckLimit::Count(n) => Some(n),
        }
    }
}
