//! Deck source collaborator.
//!
//! Resolves a deck locator (preset name, URL, or local file path) to raw
//! rows and normalizes them into a [`VocabularyStore`]. Remote decks are
//! JSON row arrays; results are cached per locator for five minutes, the
//! same horizon the original applied to its spreadsheet reads. Any failure
//! or empty source degrades to the built-in sample deck — `DataUnavailable`
//! is never fatal.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use tango_engine::{normalize_rows, VocabularyStore};

const CACHE_TTL: Duration = Duration::from_secs(300);

/// Preset name used for `DECK_URL`.
pub const MAIN_PRESET: &str = "main";

/// Locator resolving to the built-in sample deck.
pub const SAMPLE_LOCATOR: &str = "sample";

#[derive(Debug, Error)]
enum FetchError {
    #[error("HTTP 请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("读取文件失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("行数据解析失败: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the loaded deck actually came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckOrigin {
    Remote,
    File,
    Sample,
}

/// A resolved, normalized deck.
pub struct LoadedDeck {
    pub store: VocabularyStore,
    pub origin: DeckOrigin,
    /// Identity used in the deck cache key
    pub deck_id: String,
}

pub struct DeckSource {
    client: reqwest::Client,
    presets: BTreeMap<String, String>,
    cache: RwLock<HashMap<String, (Instant, Vec<Vec<String>>)>>,
}

impl DeckSource {
    pub fn new(default_deck_url: Option<String>, decks_file: Option<&Path>) -> Self {
        let mut presets = BTreeMap::new();
        if let Some(url) = default_deck_url {
            presets.insert(MAIN_PRESET.to_string(), url);
        }
        if let Some(path) = decks_file {
            match load_presets(path) {
                Ok(loaded) => presets.extend(loaded),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "deck presets not loaded");
                }
            }
        }

        Self {
            client: reqwest::Client::new(),
            presets,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Preset names offered by the configuration surface.
    pub fn preset_names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    /// Load and normalize the deck behind `locator`.
    ///
    /// `None`, empty, or `"sample"` selects the built-in deck directly;
    /// everything else is resolved (preset → URL) and fetched, falling
    /// back to the sample deck on any failure.
    pub async fn load(&self, locator: Option<&str>) -> LoadedDeck {
        let locator = locator.map(str::trim).unwrap_or_default();
        if locator.is_empty() || locator == SAMPLE_LOCATOR {
            return LoadedDeck {
                store: VocabularyStore::sample(),
                origin: DeckOrigin::Sample,
                deck_id: SAMPLE_LOCATOR.to_string(),
            };
        }

        let resolved = self
            .presets
            .get(locator)
            .cloned()
            .unwrap_or_else(|| locator.to_string());
        let remote = resolved.starts_with("http://") || resolved.starts_with("https://");

        match self.rows_for(&resolved, remote).await {
            Ok(rows) => {
                let store = VocabularyStore::from_rows(&rows);
                if store.is_empty() {
                    tracing::warn!(locator = %resolved, "deck source empty, falling back to sample data");
                    return LoadedDeck {
                        store: VocabularyStore::sample(),
                        origin: DeckOrigin::Sample,
                        deck_id: SAMPLE_LOCATOR.to_string(),
                    };
                }
                LoadedDeck {
                    store,
                    origin: if remote {
                        DeckOrigin::Remote
                    } else {
                        DeckOrigin::File
                    },
                    deck_id: resolved,
                }
            }
            Err(err) => {
                tracing::warn!(locator = %resolved, error = %err, "deck source unreachable, falling back to sample data");
                LoadedDeck {
                    store: VocabularyStore::sample(),
                    origin: DeckOrigin::Sample,
                    deck_id: SAMPLE_LOCATOR.to_string(),
                }
            }
        }
    }

    async fn rows_for(&self, resolved: &str, remote: bool) -> Result<Vec<Vec<String>>, FetchError> {
        {
            let cache = self.cache.read().await;
            if let Some((at, rows)) = cache.get(resolved) {
                if at.elapsed() < CACHE_TTL {
                    return Ok(rows.clone());
                }
            }
        }

        let rows: Vec<Vec<String>> = if remote {
            self.client
                .get(resolved)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?
        } else {
            let raw = tokio::fs::read_to_string(resolved).await?;
            serde_json::from_str(&raw)?
        };

        let mut cache = self.cache.write().await;
        cache.insert(resolved.to_string(), (Instant::now(), rows.clone()));
        Ok(rows)
    }
}

fn load_presets(path: &Path) -> Result<BTreeMap<String, String>, FetchError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
