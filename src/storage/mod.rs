//! Storage abstractions for the output document.
//!
//! The run produces exactly one JSON document. Writing it is the only
//! side effect whose failure must abort the process.

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RunResult;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a report write operation.
#[derive(Debug, Clone)]
pub struct WriteSummary {
    /// Where the document was written
    pub path: PathBuf,

    /// Total notices across all colleges
    pub item_count: usize,
}

/// Trait for report storage backends.
#[async_trait]
pub trait ReportStorage: Send + Sync {
    /// Write the run's output document.
    async fn write_report(&self, report: &RunResult) -> Result<WriteSummary>;
}
