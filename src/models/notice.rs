//! Notice data structure.

use serde::{Deserialize, Serialize};

/// A single notice extracted from a listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoticeItem {
    /// Notice title, never empty
    pub title: String,

    /// Absolute URL of the article page; unique within a department's result
    pub url: String,

    /// Publication date as `YYYY-MM-DD`, or empty when no date was found
    pub date: String,
}
