use std::path::{Path, PathBuf};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::{error, info};

use crate::error::{AppError, Result};

pub const UNTITLED: &str = "untitled";
pub const UNKNOWN_ID: &str = "unknown_id";
const MAX_TITLE_CHARS: usize = 150;

/// Writes caller-supplied video records as pretty JSON files under one directory.
///
/// Names carry a second-resolution timestamp only, so two records with the
/// same title and id stored within the same second overwrite each other.
#[derive(Clone, Debug)]
pub struct VideoArchive {
    dir: PathBuf,
}

impl VideoArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores the whole payload and returns the file name it was written under.
    pub async fn store(&self, payload: &Value) -> Result<String> {
        let title = payload.get("video_title").and_then(Value::as_str);
        let video_id = payload.get("video_id").and_then(Value::as_str);
        let filename = archive_filename(title, video_id, Local::now().naive_local());

        let bytes = to_pretty_json(payload)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            error!(dir = %self.dir.display(), error = %e, "Failed to create archive directory");
            AppError::from(e)
        })?;

        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to write video data");
            AppError::from(e)
        })?;

        info!(path = %path.display(), "Video data stored");
        Ok(filename)
    }
}

/// Four-space indentation; non-ASCII text is written as raw UTF-8.
fn to_pretty_json(payload: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    payload
        .serialize(&mut serializer)
        .map_err(|e| AppError::StorageWrite(e.to_string()))?;
    Ok(out)
}

/// Keeps word characters, whitespace, `-` and `!`; turns whitespace runs into a
/// single `_`; caps the length at 150 characters and drops trailing `_`.
pub fn sanitize_title(title: &str) -> String {
    let mut collapsed = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                collapsed.push('_');
            }
            in_whitespace = true;
        } else if c.is_alphanumeric() || c == '_' || c == '-' || c == '!' {
            collapsed.push(c);
            in_whitespace = false;
        }
    }

    let truncated: String = collapsed.chars().take(MAX_TITLE_CHARS).collect();
    truncated.trim_end_matches('_').to_string()
}

pub fn archive_filename(title: Option<&str>, video_id: Option<&str>, at: NaiveDateTime) -> String {
    let video_id = match sanitize_title(video_id.unwrap_or(UNKNOWN_ID)) {
        id if id.is_empty() => UNKNOWN_ID.to_string(),
        id => id,
    };

    let stem = match sanitize_title(title.unwrap_or(UNTITLED)) {
        stem if stem.is_empty() => video_id.clone(),
        stem => stem,
    };

    format!("{}_-_{}_-_{}.json", stem, video_id, at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::tempdir;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn punctuation_is_stripped_and_spaces_collapse() {
        assert_eq!(
            archive_filename(Some("Hello,   World!!!"), Some("abc123"), at()),
            "Hello_World!!!_-_abc123_-_20240102_030405.json"
        );
    }

    #[test]
    fn trailing_underscores_are_trimmed() {
        assert_eq!(sanitize_title("Rust tips ??? "), "Rust_tips");
    }

    #[test]
    fn title_is_capped_at_150_chars() {
        let title = "é".repeat(200);
        assert_eq!(sanitize_title(&title).chars().count(), 150);
    }

    #[test]
    fn multibyte_title_is_capped_by_chars_not_bytes() {
        let stem = sanitize_title(&"م".repeat(200));
        assert_eq!(stem.chars().count(), 150);
        assert_eq!(stem.len(), 300);
    }

    #[test]
    fn truncation_happens_before_trimming() {
        let title = format!("{} tail", "a".repeat(149));
        assert_eq!(sanitize_title(&title), "a".repeat(149));
    }

    #[test]
    fn unicode_word_characters_survive() {
        assert_eq!(sanitize_title("مرحبا بالعالم"), "مرحبا_بالعالم");
    }

    #[test]
    fn empty_stem_falls_back_to_video_id() {
        assert_eq!(
            archive_filename(Some("###"), Some("abc123"), at()),
            "abc123_-_abc123_-_20240102_030405.json"
        );
    }

    #[test]
    fn missing_fields_use_placeholders() {
        assert_eq!(
            archive_filename(None, None, at()),
            "untitled_-_unknown_id_-_20240102_030405.json"
        );
    }

    #[test]
    fn path_separators_in_id_are_dropped() {
        assert_eq!(
            archive_filename(Some("t"), Some("../etc/passwd"), at()),
            "t_-_etcpasswd_-_20240102_030405.json"
        );
    }

    #[tokio::test]
    async fn stores_full_payload_with_raw_unicode() {
        let dir = tempdir().unwrap();
        let archive = VideoArchive::new(dir.path().join("video_data"));
        let payload = json!({
            "video_title": "Café ☕ talk",
            "video_id": "xyz",
            "metadata": { "likes": 10 },
            "chapters": [{ "title": "Intro", "time": "0:00" }]
        });

        let filename = archive.store(&payload).await.unwrap();
        assert!(filename.starts_with("Café_talk_-_xyz_-_"));

        let raw = std::fs::read_to_string(archive.dir().join(&filename)).unwrap();
        assert!(raw.contains("Café ☕ talk"));
        assert!(raw.contains("\n    \"video_id\""));
        let stored: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, payload);
    }

    #[tokio::test]
    async fn write_failure_is_a_storage_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();
        let archive = VideoArchive::new(blocker.join("video_data"));

        let err = archive.store(&json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::StorageWrite(_)));
    }
}
