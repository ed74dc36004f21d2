//! 词库模块
//!
//! 将外部数据源的原始行规整为 [`VocabItem`] 记录：
//! - 前两列为空或缺失的行被丢弃
//! - 第 3-5 列作为「固定误答选项」(0-3 个)
//! - 第 6 列作为「解说」
//! - 首行若是已知表头标签则被丢弃
//!
//! 数据源不可用时由调用方退回内置的 16 组示例词条。

use crate::types::{VocabItem, HEADER_LABELS};

/// 一次加载的词库。加载后词条不可变，生命周期为一个牌组。
#[derive(Clone, Debug, Default)]
pub struct VocabularyStore {
    items: Vec<VocabItem>,
}

impl VocabularyStore {
    pub fn new(items: Vec<VocabItem>) -> Self {
        Self { items }
    }

    /// Normalize raw rows from a deck source.
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        Self::new(normalize_rows(rows))
    }

    /// Built-in sample deck for local development and source fallback.
    pub fn sample() -> Self {
        Self::new(sample_items())
    }

    pub fn items(&self) -> &[VocabItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Normalize raw spreadsheet-like rows into vocabulary items.
///
/// Column semantics: col0 front, col1 back, col2-4 optional wrong choices,
/// col5 optional explanation. A leading header row whose first column
/// matches a known label set is dropped after normalization.
pub fn normalize_rows(rows: &[Vec<String>]) -> Vec<VocabItem> {
    let mut items: Vec<VocabItem> = Vec::with_capacity(rows.len());

    for row in rows {
        if row.len() < 2 {
            continue;
        }
        let front = row[0].trim();
        let back = row[1].trim();
        if front.is_empty() || back.is_empty() {
            continue;
        }

        let wrong_choices: Vec<String> = row
            .iter()
            .skip(2)
            .take(3)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        let explanation = row
            .get(5)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        items.push(VocabItem {
            front: front.to_string(),
            back: back.to_string(),
            wrong_choices,
            explanation,
        });
    }

    if let Some(first) = items.first() {
        let label = first.front.to_lowercase();
        if HEADER_LABELS.iter().any(|h| *h == label) {
            items.remove(0);
        }
    }

    items
}

/// 内置示例词条（16 组）
pub fn sample_items() -> Vec<VocabItem> {
    const PAIRS: [(&str, &str); 16] = [
        ("Apple", "りんご"),
        ("Dog", "犬"),
        ("Cat", "猫"),
        ("Book", "本"),
        ("Water", "水"),
        ("Fire", "火"),
        ("Mountain", "山"),
        ("River", "川"),
        ("Sky", "空"),
        ("Earth", "地球"),
        ("Sun", "太陽"),
        ("Moon", "月"),
        ("Star", "星"),
        ("Tree", "木"),
        ("Flower", "花"),
        ("Bird", "鳥"),
    ];

    PAIRS
        .iter()
        .map(|(front, back)| VocabItem::new(*front, *back))
        .collect()
}
