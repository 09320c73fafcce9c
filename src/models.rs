//! Data models for searches and the articles they return.
//!
//! This module defines the core data structures used throughout the application:
//! - [`TimeRange`]: How far back a search looks, with its date arithmetic
//! - [`SearchParams`]: One saved search (topics, count, range, timestamp)
//! - [`RawArticle`]: An article exactly as the model returns it
//! - [`Article`]: A validated article tagged with the topic that produced it
//!
//! Persisted [`SearchParams`] use camelCase field names to stay compatible
//! with data written by earlier versions of this tool, hence the
//! `#[serde(rename_all = "camelCase")]` attribute.

use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How far back a search looks for articles.
///
/// The wire strings (`"1week"`, `"2weeks"`, ...) appear in persisted history
/// entries and on the command line. Anything unrecognized falls back to
/// [`TimeRange::OneWeek`] rather than failing; the range only widens a search,
/// so a conservative default is always safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum TimeRange {
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "2weeks")]
    TwoWeeks,
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "2months")]
    TwoMonths,
    #[serde(rename = "quarter")]
    Quarter,
}

impl TimeRange {
    /// The wire/CLI string for this range.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneWeek => "1week",
            TimeRange::TwoWeeks => "2weeks",
            TimeRange::OneMonth => "1month",
            TimeRange::TwoMonths => "2months",
            TimeRange::Quarter => "quarter",
        }
    }

    /// Human-readable label used in history listings.
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::OneWeek => "Last 1 Week",
            TimeRange::TwoWeeks => "Last 2 Weeks",
            TimeRange::OneMonth => "Last 1 Month",
            TimeRange::TwoMonths => "Last 2 Months",
            TimeRange::Quarter => "Past Quarter",
        }
    }

    /// The earliest publication date a search with this range accepts.
    ///
    /// Week ranges subtract whole days; month ranges subtract calendar months,
    /// clamping the day-of-month when the target month is shorter (March 31
    /// minus one month is the last day of February).
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            TimeRange::OneWeek => today - Duration::days(7),
            TimeRange::TwoWeeks => today - Duration::days(14),
            TimeRange::OneMonth => today - Months::new(1),
            TimeRange::TwoMonths => today - Months::new(2),
            TimeRange::Quarter => today - Months::new(3),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "1week" => TimeRange::OneWeek,
            "2weeks" => TimeRange::TwoWeeks,
            "1month" => TimeRange::OneMonth,
            "2months" => TimeRange::TwoMonths,
            "quarter" => TimeRange::Quarter,
            _ => TimeRange::OneWeek,
        })
    }
}

/// The parameters of one saved search.
///
/// Two searches are considered the same search when their joined topics,
/// per-topic count, and time range all match; the timestamp records when the
/// search was last run and is excluded from that identity. Re-running an
/// identical search therefore refreshes its history entry instead of adding
/// a duplicate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// The topics as entered, comma-split and trimmed.
    pub topics: Vec<String>,
    /// How many articles were requested per topic.
    pub articles_per_topic: u32,
    /// How far back the search looked.
    pub time_range: TimeRange,
    /// RFC 3339 timestamp of when the search ran (UTC).
    pub timestamp: String,
}

impl SearchParams {
    /// The topics joined for display and identity comparison.
    pub fn topics_joined(&self) -> String {
        self.topics.join(", ")
    }

    /// Whether `other` is the same search, ignoring timestamps.
    pub fn same_search(&self, other: &SearchParams) -> bool {
        self.topics_joined() == other.topics_joined()
            && self.articles_per_topic == other.articles_per_topic
            && self.time_range == other.time_range
    }

    /// The timestamp parsed for ordering; `None` when it is unparseable.
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }
}

/// An article exactly as the model returns it, before validation.
///
/// Every field is required; deserialization fails if the model omits one.
/// Unknown extra fields are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawArticle {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub published_date: String,
    pub published_by: String,
}

impl RawArticle {
    /// The name of the first empty field, or `None` when all five are filled.
    pub fn empty_field(&self) -> Option<&'static str> {
        if self.title.is_empty() {
            Some("title")
        } else if self.url.is_empty() {
            Some("url")
        } else if self.summary.is_empty() {
            Some("summary")
        } else if self.published_date.is_empty() {
            Some("published_date")
        } else if self.published_by.is_empty() {
            Some("published_by")
        } else {
            None
        }
    }
}

/// A validated article tagged with the topic whose search produced it.
///
/// This is the unit that gets rendered, persisted in historical article
/// sets, and exported to CSV.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    pub topic: String,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub published_date: String,
    pub published_by: String,
}

impl Article {
    /// Attach a topic to a validated [`RawArticle`].
    pub fn from_raw(topic: &str, raw: RawArticle) -> Self {
        Article {
            topic: topic.to_string(),
            title: raw.title,
            url: raw.url,
            summary: raw.summary,
            published_date: raw.published_date,
            published_by: raw.published_by,
        }
    }
}

/// Split a raw comma-separated topics string into trimmed topics.
///
/// Empty segments are kept: `"a,,b"` yields three topics, one of them empty.
/// Whether the input as a whole is usable is checked before splitting, not
/// here.
pub fn split_topics(raw: &str) -> Vec<String> {
    raw.split(',').map(|t| t.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(topics: &[&str], count: u32, range: TimeRange, ts: &str) -> SearchParams {
        SearchParams {
            topics: topics.iter().map(|t| t.to_string()).collect(),
            articles_per_topic: count,
            time_range: range,
            timestamp: ts.to_string(),
        }
    }

    #[test]
    fn test_time_range_parses_known_strings() {
        assert_eq!("1week".parse::<TimeRange>().unwrap(), TimeRange::OneWeek);
        assert_eq!("2weeks".parse::<TimeRange>().unwrap(), TimeRange::TwoWeeks);
        assert_eq!("1month".parse::<TimeRange>().unwrap(), TimeRange::OneMonth);
        assert_eq!("2months".parse::<TimeRange>().unwrap(), TimeRange::TwoMonths);
        assert_eq!("quarter".parse::<TimeRange>().unwrap(), TimeRange::Quarter);
    }

    #[test]
    fn test_time_range_unknown_falls_back_to_one_week() {
        assert_eq!("6months".parse::<TimeRange>().unwrap(), TimeRange::OneWeek);
        assert_eq!("".parse::<TimeRange>().unwrap(), TimeRange::OneWeek);
    }

    #[test]
    fn test_time_range_labels() {
        assert_eq!(TimeRange::OneWeek.label(), "Last 1 Week");
        assert_eq!(TimeRange::TwoWeeks.label(), "Last 2 Weeks");
        assert_eq!(TimeRange::OneMonth.label(), "Last 1 Month");
        assert_eq!(TimeRange::TwoMonths.label(), "Last 2 Months");
        assert_eq!(TimeRange::Quarter.label(), "Past Quarter");
    }

    #[test]
    fn test_start_date_weeks() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            TimeRange::OneWeek.start_date(today),
            NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()
        );
        assert_eq!(
            TimeRange::TwoWeeks.start_date(today),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_start_date_months() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(
            TimeRange::OneMonth.start_date(today),
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
        );
        assert_eq!(
            TimeRange::TwoMonths.start_date(today),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            TimeRange::Quarter.start_date(today),
            NaiveDate::from_ymd_opt(2023, 12, 15).unwrap()
        );
    }

    #[test]
    fn test_start_date_clamps_short_months() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(
            TimeRange::OneMonth.start_date(today),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_search_params_camel_case_wire_format() {
        let p = params(&["rust"], 5, TimeRange::TwoWeeks, "2024-01-01T00:00:00.000Z");
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"articlesPerTopic\":5"));
        assert!(json.contains("\"timeRange\":\"2weeks\""));

        let back: SearchParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_same_search_ignores_timestamp() {
        let a = params(&["ai", "rust"], 5, TimeRange::OneMonth, "2024-01-01T00:00:00.000Z");
        let b = params(&["ai", "rust"], 5, TimeRange::OneMonth, "2024-02-01T00:00:00.000Z");
        assert!(a.same_search(&b));
    }

    #[test]
    fn test_same_search_distinguishes_count_and_range() {
        let a = params(&["ai"], 5, TimeRange::OneMonth, "2024-01-01T00:00:00.000Z");
        let b = params(&["ai"], 3, TimeRange::OneMonth, "2024-01-01T00:00:00.000Z");
        let c = params(&["ai"], 5, TimeRange::Quarter, "2024-01-01T00:00:00.000Z");
        assert!(!a.same_search(&b));
        assert!(!a.same_search(&c));
    }

    #[test]
    fn test_parsed_timestamp_none_on_garbage() {
        let p = params(&["ai"], 5, TimeRange::OneWeek, "yesterday");
        assert!(p.parsed_timestamp().is_none());
    }

    #[test]
    fn test_raw_article_requires_all_fields() {
        let json = r#"{
            "title": "Title",
            "url": "https://example.com",
            "summary": "Summary",
            "published_date": "2024-01-01"
        }"#;
        let result: Result<RawArticle, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_article_ignores_extra_fields() {
        let json = r#"{
            "title": "Title",
            "url": "https://example.com",
            "summary": "Summary",
            "published_date": "2024-01-01",
            "published_by": "Example",
            "domain_authority": 92
        }"#;
        let article: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.empty_field(), None);
    }

    #[test]
    fn test_empty_field_reports_first_gap() {
        let article = RawArticle {
            title: "Title".to_string(),
            url: "https://example.com".to_string(),
            summary: "".to_string(),
            published_date: "2024-01-01".to_string(),
            published_by: "Example".to_string(),
        };
        assert_eq!(article.empty_field(), Some("summary"));
    }

    #[test]
    fn test_article_from_raw_tags_topic() {
        let raw = RawArticle {
            title: "Title".to_string(),
            url: "https://example.com".to_string(),
            summary: "Summary".to_string(),
            published_date: "2024-01-01".to_string(),
            published_by: "Example".to_string(),
        };
        let article = Article::from_raw("rust", raw);
        assert_eq!(article.topic, "rust");
        assert_eq!(article.title, "Title");
    }

    #[test]
    fn test_split_topics_trims() {
        assert_eq!(split_topics(" ai , rust "), vec!["ai", "rust"]);
    }

    #[test]
    fn test_split_topics_keeps_empty_segments() {
        assert_eq!(split_topics("a,,b"), vec!["a", "", "b"]);
        assert_eq!(split_topics("one"), vec!["one"]);
    }
}
