//! The search workflow: prompt, validate, aggregate, record.
//!
//! [`SearchWorkflow`] drives one search end to end. Topics are queried
//! strictly one after another; each reply must be a JSON array of complete
//! five-field articles or the entire run is abandoned. Only a fully
//! successful run touches the persisted history, so a failure can never
//! leave a half-written entry behind.
//!
//! A workflow executes at most one search at a time. Starting a second
//! search while one is running is rejected outright rather than queued;
//! the two runs would otherwise race each other into the history store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{Local, SecondsFormat, Utc};
use tracing::{debug, info, instrument, warn};

use crate::api::{ChatCompletions, SYSTEM_PROMPT, user_prompt};
use crate::error::{Result, ScoutError};
use crate::history::HistoryStore;
use crate::models::{Article, RawArticle, SearchParams, TimeRange, split_topics};
use crate::store::KvStore;
use crate::utils::truncate_for_log;

/// Runs searches against a [`ChatCompletions`] backend and records them.
pub struct SearchWorkflow<C, S: KvStore> {
    client: C,
    history: Mutex<HistoryStore<S>>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a run ends, success or not.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<C: ChatCompletions, S: KvStore> SearchWorkflow<C, S> {
    pub fn new(client: C, history: HistoryStore<S>) -> Self {
        SearchWorkflow {
            client,
            history: Mutex::new(history),
            in_flight: AtomicBool::new(false),
        }
    }

    fn history(&self) -> MutexGuard<'_, HistoryStore<S>> {
        self.history.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run one search and return the combined article list.
    ///
    /// `topics` is the raw comma-separated input. Topics are queried in
    /// order, one at a time; the articles of every topic must validate before
    /// anything is shown or saved. On success the search parameters (with a
    /// fresh timestamp) and the combined article list are recorded in the
    /// history store.
    ///
    /// # Errors
    ///
    /// - [`ScoutError::SearchInFlight`] if another search is running
    /// - [`ScoutError::EmptyTopics`] if `topics` is all whitespace
    /// - [`ScoutError::ContentNotAvailable`] if any reply fails validation
    /// - transport errors from the backend, passed through unchanged
    #[instrument(level = "info", skip_all)]
    pub async fn execute(
        &self,
        topics: &str,
        count: u32,
        range: TimeRange,
    ) -> Result<Vec<Article>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Search rejected: one is already running");
            return Err(ScoutError::SearchInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        if topics.trim().is_empty() {
            return Err(ScoutError::EmptyTopics);
        }
        let topic_list = split_topics(topics);
        let start_date = range.start_date(Local::now().date_naive());
        info!(
            topics = %topics,
            count,
            range = range.as_str(),
            %start_date,
            "Starting search"
        );

        let mut collected: Vec<Article> = Vec::new();
        for topic in &topic_list {
            let prompt = user_prompt(topic, count, start_date);
            let reply = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
            let articles = parse_articles(topic, &reply)?;
            debug!(topic = %topic, count = articles.len(), "Topic completed");
            collected.extend(articles);
        }

        let params = SearchParams {
            topics: topic_list,
            articles_per_topic: count,
            time_range: range,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        self.history().record_search(params, collected.clone())?;
        info!(total = collected.len(), "Search recorded");

        Ok(collected)
    }
}

/// Parse one topic's reply into tagged articles.
///
/// Anything that is not a non-empty JSON array of complete five-field
/// articles fails the topic, and with it the whole run. The offending reply
/// is logged; the caller only ever sees the single user-facing message.
fn parse_articles(topic: &str, reply: &str) -> Result<Vec<Article>> {
    let raw: Vec<RawArticle> = match serde_json::from_str(reply) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(
                topic = %topic,
                error = %e,
                reply = %truncate_for_log(reply, 300),
                "Reply was not a JSON article array"
            );
            return Err(ScoutError::ContentNotAvailable);
        }
    };

    if raw.is_empty() {
        warn!(topic = %topic, "Reply contained an empty article array");
        return Err(ScoutError::ContentNotAvailable);
    }

    for (i, article) in raw.iter().enumerate() {
        if let Some(field) = article.empty_field() {
            warn!(topic = %topic, index = i, field, "Article field is empty");
            return Err(ScoutError::ContentNotAvailable);
        }
    }

    Ok(raw
        .into_iter()
        .map(|r| Article::from_raw(topic, r))
        .collect())
}
