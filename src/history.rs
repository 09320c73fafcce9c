//! Search history and historical article sets.
//!
//! [`HistoryStore`] owns the two persisted collections:
//!
//! - `searchHistory`: the last [`MAX_HISTORY_ENTRIES`] searches, newest first
//! - `historicalArticles`: timestamp -> full article list for each of them
//!
//! Both are loaded once at startup, mutated in memory when a search succeeds,
//! and rewritten wholesale after every mutation (history first, then
//! articles). Article sets whose timestamp no longer appears in the history
//! are pruned in the same pass, so the article map only ever holds sets that
//! a history entry can reach.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::models::{Article, SearchParams};
use crate::store::KvStore;

/// Store key for the search history list.
pub const HISTORY_KEY: &str = "searchHistory";
/// Store key for the timestamp-keyed article sets.
pub const ARTICLES_KEY: &str = "historicalArticles";
/// Maximum number of saved searches; the oldest is evicted beyond this.
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// The persisted search history and its article sets, backed by a [`KvStore`].
#[derive(Debug)]
pub struct HistoryStore<S: KvStore> {
    store: S,
    history: Vec<SearchParams>,
    articles: BTreeMap<String, Vec<Article>>,
}

impl<S: KvStore> HistoryStore<S> {
    /// Load both collections from the store.
    ///
    /// Absent keys mean empty collections; a key that is present but does not
    /// parse is an error, since silently resetting it would throw away the
    /// user's history.
    pub fn load(store: S) -> Result<Self> {
        let history: Vec<SearchParams> = match store.get(HISTORY_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        let articles: BTreeMap<String, Vec<Article>> = match store.get(ARTICLES_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => BTreeMap::new(),
        };
        debug!(
            entries = history.len(),
            article_sets = articles.len(),
            "History loaded"
        );
        Ok(HistoryStore {
            store,
            history,
            articles,
        })
    }

    /// Saved searches, newest first.
    pub fn entries(&self) -> &[SearchParams] {
        &self.history
    }

    /// The saved search at `index` (0 = most recent).
    pub fn entry(&self, index: usize) -> Option<&SearchParams> {
        self.history.get(index)
    }

    /// The stored article set for a search timestamp.
    pub fn articles_for(&self, timestamp: &str) -> Option<&[Article]> {
        self.articles.get(timestamp).map(Vec::as_slice)
    }

    /// Record a successful search and persist both collections.
    ///
    /// If an entry with the same topics, count, and range already exists it is
    /// replaced in place (refreshing its timestamp); otherwise the new entry
    /// is added. The list is then re-sorted newest first and truncated to
    /// [`MAX_HISTORY_ENTRIES`], and article sets orphaned by the eviction or
    /// replacement are dropped.
    pub fn record_search(&mut self, params: SearchParams, articles: Vec<Article>) -> Result<()> {
        let timestamp = params.timestamp.clone();
        match self.history.iter().position(|h| h.same_search(&params)) {
            Some(i) => self.history[i] = params,
            None => self.history.insert(0, params),
        }
        // Unparseable timestamps sort after everything else.
        self.history
            .sort_by(|a, b| b.parsed_timestamp().cmp(&a.parsed_timestamp()));
        self.history.truncate(MAX_HISTORY_ENTRIES);

        self.articles.insert(timestamp, articles);
        let history = &self.history;
        self.articles
            .retain(|ts, _| history.iter().any(|h| h.timestamp == *ts));

        self.persist()
    }

    fn persist(&mut self) -> Result<()> {
        let history_json = serde_json::to_string(&self.history)?;
        self.store.set(HISTORY_KEY, &history_json)?;
        let articles_json = serde_json::to_string(&self.articles)?;
        self.store.set(ARTICLES_KEY, &articles_json)?;
        debug!(
            entries = self.history.len(),
            article_sets = self.articles.len(),
            "History persisted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeRange;
    use crate::store::MemoryStore;

    fn params(topics: &[&str], ts: &str) -> SearchParams {
        SearchParams {
            topics: topics.iter().map(|t| t.to_string()).collect(),
            articles_per_topic: 5,
            time_range: TimeRange::TwoWeeks,
            timestamp: ts.to_string(),
        }
    }

    fn article(topic: &str, title: &str) -> Article {
        Article {
            topic: topic.to_string(),
            title: title.to_string(),
            url: "https://example.com".to_string(),
            summary: "Summary".to_string(),
            published_date: "2024-01-01".to_string(),
            published_by: "Example".to_string(),
        }
    }

    fn ts(i: usize) -> String {
        format!("2024-01-{:02}T00:00:00.000Z", i)
    }

    #[test]
    fn test_load_from_empty_store() {
        let history = HistoryStore::load(MemoryStore::new()).unwrap();
        assert!(history.entries().is_empty());
        assert!(history.articles_for("2024-01-01T00:00:00.000Z").is_none());
    }

    #[test]
    fn test_load_rejects_corrupt_history() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "definitely not json").unwrap();
        assert!(HistoryStore::load(store).is_err());
    }

    #[test]
    fn test_record_persists_both_collections() {
        let mut store = MemoryStore::new();
        {
            let mut history = HistoryStore::load(&mut store).unwrap();
            history
                .record_search(params(&["rust"], &ts(1)), vec![article("rust", "A")])
                .unwrap();
        }

        let reloaded = HistoryStore::load(&mut store).unwrap();
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].topics, vec!["rust"]);
        assert_eq!(reloaded.articles_for(&ts(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_same_search_replaces_entry_and_prunes_old_articles() {
        let mut history = HistoryStore::load(MemoryStore::new()).unwrap();
        history
            .record_search(params(&["rust"], &ts(1)), vec![article("rust", "A")])
            .unwrap();
        history
            .record_search(params(&["rust"], &ts(2)), vec![article("rust", "B")])
            .unwrap();

        assert_eq!(history.entries().len(), 1);
        assert_eq!(history.entries()[0].timestamp, ts(2));
        assert!(history.articles_for(&ts(1)).is_none());
        assert_eq!(history.articles_for(&ts(2)).unwrap()[0].title, "B");
    }

    #[test]
    fn test_history_caps_at_ten_and_evicts_articles() {
        let mut history = HistoryStore::load(MemoryStore::new()).unwrap();
        for i in 1..=11 {
            let topic = format!("topic{i}");
            history
                .record_search(params(&[&topic], &ts(i)), vec![article(&topic, "T")])
                .unwrap();
        }

        assert_eq!(history.entries().len(), MAX_HISTORY_ENTRIES);
        // The oldest entry and its article set are gone.
        assert!(history.entries().iter().all(|h| h.timestamp != ts(1)));
        assert!(history.articles_for(&ts(1)).is_none());
        assert!(history.articles_for(&ts(11)).is_some());
    }

    #[test]
    fn test_entries_sorted_newest_first() {
        let mut history = HistoryStore::load(MemoryStore::new()).unwrap();
        history
            .record_search(params(&["b"], &ts(2)), vec![])
            .unwrap();
        history
            .record_search(params(&["a"], &ts(5)), vec![])
            .unwrap();
        history
            .record_search(params(&["c"], &ts(3)), vec![])
            .unwrap();

        let stamps: Vec<&str> = history
            .entries()
            .iter()
            .map(|h| h.timestamp.as_str())
            .collect();
        assert_eq!(stamps, vec![ts(5), ts(3), ts(2)]);
    }

    #[test]
    fn test_unparseable_timestamp_sorts_last() {
        let mut history = HistoryStore::load(MemoryStore::new()).unwrap();
        history
            .record_search(params(&["odd"], "not a timestamp"), vec![])
            .unwrap();
        history
            .record_search(params(&["new"], &ts(1)), vec![])
            .unwrap();

        assert_eq!(history.entries()[0].timestamp, ts(1));
        assert_eq!(history.entries()[1].timestamp, "not a timestamp");
    }

    #[test]
    fn test_entry_indexing() {
        let mut history = HistoryStore::load(MemoryStore::new()).unwrap();
        history
            .record_search(params(&["rust"], &ts(1)), vec![])
            .unwrap();

        assert!(history.entry(0).is_some());
        assert!(history.entry(1).is_none());
    }
}
