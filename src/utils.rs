//! Utility functions for logging, timestamp display, and file system checks.

use chrono::{DateTime, Local};
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::Result;

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes with an ellipsis and
/// byte count indicator appended. The cut lands on a char boundary, so a
/// multibyte character straddling `max` is dropped whole rather than split.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Render an RFC 3339 timestamp in local time for display.
///
/// Saved searches carry UTC timestamps; history listings show them in the
/// user's local time. A timestamp that fails to parse is shown verbatim
/// rather than dropped.
pub fn format_local_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!(path = %path.display(), "Output directory is writable");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_backs_off_to_char_boundary() {
        // 'é' is two bytes and straddles the cut; it must be dropped whole.
        let s = format!("{}é{}", "a".repeat(299), "b".repeat(50));
        let result = truncate_for_log(&s, 300);
        assert!(result.starts_with(&"a".repeat(299)));
        assert!(result.contains("…(+52 bytes)"));

        // A cut landing exactly on a boundary keeps the full prefix.
        let s = format!("é{}", "b".repeat(50));
        let result = truncate_for_log(&s, 2);
        assert_eq!(result, "é…(+50 bytes)");
    }

    #[test]
    fn test_format_local_timestamp_parses_rfc3339() {
        let rendered = format_local_timestamp("2024-03-15T12:00:00.000Z");
        assert!(rendered.contains("2024"));
        assert_eq!(rendered.len(), "2024-03-15 12:00:00".len());
    }

    #[test]
    fn test_format_local_timestamp_passes_garbage_through() {
        assert_eq!(format_local_timestamp("not a timestamp"), "not a timestamp");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("csv");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
