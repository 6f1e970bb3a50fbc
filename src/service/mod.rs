pub mod client;
pub mod soap;

pub use client::AdminApiClient;

use crate::dates::TimeRange;
use crate::error::AppResult;

/// Opaque job identifier returned by the reporting service. Constructed only
/// from a submit response and discarded after fetch or failure; never reused
/// across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(String);

impl JobHandle {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three operations the pipeline needs from the reporting service.
#[async_trait::async_trait]
pub trait ReportService: Send + Sync {
    /// Start generation of a named report and return its job identifier.
    async fn submit_report(
        &self,
        folder: &str,
        report_name: &str,
        range: &TimeRange,
    ) -> AppResult<JobHandle>;

    /// Whether the job is still generating.
    async fn is_report_running(&self, handle: &JobHandle) -> AppResult<bool>;

    /// Retrieve the completed report's CSV content.
    async fn fetch_report_csv(&self, handle: &JobHandle) -> AppResult<String>;
}
