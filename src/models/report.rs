// src/models/report.rs

//! Output document structures.
//!
//! Field declaration order matters: `serde_json` serializes struct fields in
//! order, and downstream consumers of `data.json` rely on the existing shape.

use serde::{Deserialize, Serialize};

use crate::models::NoticeItem;

/// Scrape result for a single college.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentResult {
    /// College identifier
    pub id: String,

    /// College display name
    pub name: String,

    /// Listing URL the run actually fetched from
    pub source_url: String,

    /// Collected notices, first-seen page order, URL-unique
    pub items: Vec<NoticeItem>,

    /// Advisory note, present only when showing the public fallback instead
    /// of the intranet listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The full output document written once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Civil timestamp with fixed UTC+8 label, `YYYY-MM-DD HH:MM:SS CST`
    pub updated_at: String,

    /// Per-college results in configured order
    pub colleges: Vec<DepartmentResult>,
}

impl RunResult {
    /// Total number of notices across all colleges.
    pub fn item_count(&self) -> usize {
        self.colleges.iter().map(|c| c.items.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(note: Option<String>) -> DepartmentResult {
        DepartmentResult {
            id: "ckc".to_string(),
            name: "竺可桢学院".to_string(),
            source_url: "http://ckc.zju.edu.cn/54005/list.htm".to_string(),
            items: vec![NoticeItem {
                title: "测试通知".to_string(),
                url: "http://ckc.zju.edu.cn/2026/0101/c54005a100/page.htm".to_string(),
                date: "2026-01-01".to_string(),
            }],
            note,
        }
    }

    #[test]
    fn test_note_omitted_when_absent() {
        let json = serde_json::to_string(&sample_result(None)).unwrap();
        assert!(!json.contains("note"));
    }

    #[test]
    fn test_note_serialized_when_present() {
        let json = serde_json::to_string(&sample_result(Some("fallback".to_string()))).unwrap();
        assert!(json.contains("\"note\":\"fallback\""));
    }

    #[test]
    fn test_field_order_preserved() {
        let report = RunResult {
            updated_at: "2026-02-13 12:00:00 CST".to_string(),
            colleges: vec![sample_result(None)],
        };
        let json = serde_json::to_string(&report).unwrap();

        let updated_at = json.find("updated_at").unwrap();
        let colleges = json.find("colleges").unwrap();
        assert!(updated_at < colleges);

        for pair in [("\"id\"", "\"name\""), ("\"name\"", "\"source_url\""), ("\"source_url\"", "\"items\"")] {
            assert!(json.find(pair.0).unwrap() < json.find(pair.1).unwrap());
        }
    }

    #[test]
    fn test_item_count() {
        let report = RunResult {
            updated_at: "2026-02-13 12:00:00 CST".to_string(),
            colleges: vec![sample_result(None), sample_result(None)],
        };
        assert_eq!(report.item_count(), 2);
    }
}
