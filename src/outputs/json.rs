//! JSON output for the daily digest.
//!
//! One file per run, named after the target day:
//! ```text
//! output_dir/
//! └── 36kr_2024-06-11_news.json
//! ```
//!
//! The document is pretty-printed with two-space indentation and keeps
//! non-ASCII text as-is, so the files diff cleanly.

use crate::error::OutputError;
use crate::models::ResultDocument;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Source tag used as the file-name prefix.
pub const SOURCE_TAG: &str = "36kr";

/// File name for the digest of `date` (`YYYY-MM-DD`).
pub fn output_filename(date: &str) -> String {
    format!("{SOURCE_TAG}_{date}_news.json")
}

/// Write a [`ResultDocument`] into `output_dir`, creating the directory if needed.
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Returns [`OutputError`] if the directory cannot be created, the document
/// cannot be serialized, or the file cannot be written.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), date = %document.date))]
pub async fn write_document(
    document: &ResultDocument,
    output_dir: &Path,
) -> Result<PathBuf, OutputError> {
    let json = serde_json::to_string_pretty(document)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = output_dir.join(output_filename(&document.date));
    info!(path = %path.display(), "Writing JSON");
    fs::write(&path, json).await?;
    info!(path = %path.display(), total = document.total, "Wrote news digest");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SimplifiedRecord;
    use std::collections::BTreeMap;

    fn document() -> ResultDocument {
        ResultDocument {
            date: "2024-06-11".to_string(),
            total: 1,
            categories: BTreeMap::from([("科技".to_string(), 1)]),
            news: vec![SimplifiedRecord {
                title: "大模型新进展".to_string(),
                summary: "摘要".to_string(),
                category: "科技".to_string(),
                theme: String::new(),
                publish_time: 1_718_040_000_000,
                author: "36氪".to_string(),
                image: String::new(),
                url: "https://36kr.com/p/123".to_string(),
            }],
        }
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(output_filename("2024-06-11"), "36kr_2024-06-11_news.json");
    }

    #[tokio::test]
    async fn test_write_document_creates_dir_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");

        let path = write_document(&document(), &dir).await.unwrap();

        assert_eq!(path, dir.join("36kr_2024-06-11_news.json"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("大模型新进展"), "non-ASCII text is written verbatim");
        assert!(text.contains("\n  \"date\": \"2024-06-11\""));
        assert!(text.contains("\"publishTime\": 1718040000000"));

        let parsed: ResultDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.total, 1);
        assert_eq!(parsed.news[0].url, "https://36kr.com/p/123");
    }

    #[tokio::test]
    async fn test_write_document_fails_when_dir_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("data");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = write_document(&document(), &blocker).await;

        assert!(matches!(result, Err(OutputError::Io(_))));
    }
}
