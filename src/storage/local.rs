//! Local filesystem report writer.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::RunResult;
use crate::storage::{ReportStorage, WriteSummary};

/// Writes the output document to a local path.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    output_path: PathBuf,
}

impl LocalStorage {
    /// Create a writer targeting the given output file.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Ensure the parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.output_path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.output_path).await?;
        Ok(())
    }
}

#[async_trait]
impl ReportStorage for LocalStorage {
    async fn write_report(&self, report: &RunResult) -> Result<WriteSummary> {
        let bytes = serde_json::to_vec_pretty(report)?;
        self.write_bytes(&bytes).await?;

        Ok(WriteSummary {
            path: self.output_path.clone(),
            item_count: report.item_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::models::{DepartmentResult, NoticeItem};

    fn sample_report() -> RunResult {
        RunResult {
            updated_at: "2026-02-13 12:00:00 CST".to_string(),
            colleges: vec![DepartmentResult {
                id: "sis".to_string(),
                name: "外国语学院".to_string(),
                source_url: "http://www.sis.zju.edu.cn/sischinese/12577/list.htm".to_string(),
                items: vec![NoticeItem {
                    title: "通知".to_string(),
                    url: "http://www.sis.zju.edu.cn/2026/0213/c12577a1/page.htm".to_string(),
                    date: "2026-02-13".to_string(),
                }],
                note: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_write_and_read_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        let storage = LocalStorage::new(&path);

        let summary = storage.write_report(&sample_report()).await.unwrap();
        assert_eq!(summary.item_count, 1);
        assert_eq!(summary.path, path);

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let loaded: RunResult = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.colleges.len(), 1);
        assert_eq!(loaded.colleges[0].items[0].title, "通知");
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("docs").join("data.json");
        let storage = LocalStorage::new(&path);

        storage.write_report(&sample_report()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_overwrites_previous_run() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        let storage = LocalStorage::new(&path);

        storage.write_report(&sample_report()).await.unwrap();

        let mut next = sample_report();
        next.colleges[0].items.clear();
        storage.write_report(&next).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let loaded: RunResult = serde_json::from_str(&content).unwrap();
        assert!(loaded.colleges[0].items.is_empty());
    }
}
