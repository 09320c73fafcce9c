//! Terminal rendering of results and history.
//!
//! Articles arrive already ordered by topic (the search queries topics
//! sequentially and appends), so grouping here is a single pass over
//! adjacent runs.

use chrono::Local;
use itertools::Itertools;

use crate::models::{Article, SearchParams};
use crate::utils::format_local_timestamp;

/// Render a result set grouped by topic.
///
/// Each group opens with `{topic} ({n} articles)`, followed by one block per
/// article: title, publication line, summary, link. An article with no
/// publication date shows today's date; one with no source shows
/// `Unknown Source`. Both are display fallbacks only.
pub fn render_results(articles: &[Article]) -> String {
    let mut out = String::new();
    for (topic, group) in &articles.iter().chunk_by(|a| a.topic.clone()) {
        let group: Vec<&Article> = group.collect();
        out.push_str(&format!("{} ({} articles)\n\n", topic, group.len()));
        for article in group {
            let date = if article.published_date.is_empty() {
                Local::now().date_naive().to_string()
            } else {
                article.published_date.clone()
            };
            let source = if article.published_by.is_empty() {
                "Unknown Source"
            } else {
                &article.published_by
            };
            out.push_str(&format!("  {}\n", article.title));
            out.push_str(&format!("  Published on {date} by {source}\n"));
            out.push_str(&format!("  {}\n", article.summary));
            out.push_str(&format!("  {}\n\n", article.url));
        }
    }
    out
}

/// Render the saved-search list, newest first.
///
/// `article_counts` pairs with `entries` and carries the number of stored
/// articles for each search.
pub fn render_history(entries: &[SearchParams], article_counts: &[usize]) -> String {
    if entries.is_empty() {
        return "No search history yet\n".to_string();
    }

    let mut out = String::new();
    for (i, (params, count)) in entries.iter().zip(article_counts).enumerate() {
        out.push_str(&format!("{:>2}. {}\n", i + 1, params.topics_joined()));
        out.push_str(&format!(
            "    {} per topic | {} | {} articles\n",
            params.articles_per_topic,
            params.time_range.label(),
            count
        ));
        out.push_str(&format!(
            "    Searched: {}\n",
            format_local_timestamp(&params.timestamp)
        ));
    }
    out
}

/// Render a saved search as a ready-to-edit command line.
///
/// Selecting a history entry repopulates the search, it never re-runs it;
/// printing the command leaves the re-run (or an edit first) to the user.
pub fn render_show(params: &SearchParams) -> String {
    format!(
        "Saved search from {}:\n  topic_scout search --topics \"{}\" --count {} --range {}\n",
        format_local_timestamp(&params.timestamp),
        params.topics_joined(),
        params.articles_per_topic,
        params.time_range.as_str()
    )
}
