//! CSV export of article sets.
//!
//! The format is fixed: seven columns, every cell double-quoted (headers
//! included), rows joined with `\n` and no trailing newline. Embedded double
//! quotes are doubled in the title and summary cells only; the remaining
//! fields are written as-is. The layout matches files written by earlier
//! versions of this tool.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use tracing::info;

use crate::error::Result;
use crate::models::Article;

/// Column headers, in on-disk order.
pub const CSV_HEADERS: [&str; 7] = [
    "Topic",
    "Article Heading",
    "Article Summary",
    "Article Source Name",
    "Article Source Link",
    "Article Source Date Published",
    "Generated On",
];

/// Double embedded quotes so the cell survives quoting.
fn escape(value: &str) -> String {
    value.replace('"', "\"\"")
}

/// Serialize articles to CSV text.
///
/// `generated_on` lands in the last column of every row; callers compute it
/// once per export so all rows of one file carry the same value. Articles
/// with an empty source or date get `Unknown Source` / `Unknown Date` in the
/// file only; the stored article is untouched.
pub fn to_csv(articles: &[Article], generated_on: &str) -> String {
    let mut rows = Vec::with_capacity(articles.len() + 1);
    rows.push(
        CSV_HEADERS
            .iter()
            .map(|h| format!("\"{h}\""))
            .collect::<Vec<_>>()
            .join(","),
    );

    for article in articles {
        let source = if article.published_by.is_empty() {
            "Unknown Source"
        } else {
            &article.published_by
        };
        let date = if article.published_date.is_empty() {
            "Unknown Date"
        } else {
            &article.published_date
        };
        let cells = [
            article.topic.clone(),
            escape(&article.title),
            escape(&article.summary),
            source.to_string(),
            article.url.clone(),
            date.to_string(),
            generated_on.to_string(),
        ];
        rows.push(
            cells
                .iter()
                .map(|c| format!("\"{c}\""))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    rows.join("\n")
}

/// The export filename for a given moment: `articles_<UTC timestamp>.csv`
/// with `:` and `.` replaced so the name is filesystem-safe everywhere.
pub fn export_filename(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("articles_{stamp}.csv")
}

/// Write `articles` as a CSV file into `output_dir`.
///
/// An empty article set writes nothing and returns `Ok(None)`; otherwise the
/// path of the new file comes back.
pub fn export(articles: &[Article], output_dir: &Path) -> Result<Option<PathBuf>> {
    if articles.is_empty() {
        return Ok(None);
    }

    let generated_on = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let csv = to_csv(articles, &generated_on);
    let path = output_dir.join(export_filename(Utc::now()));
    fs::write(&path, csv)?;
    info!(path = %path.display(), rows = articles.len(), "CSV export written");
    Ok(Some(path))
}
