use crate::error::AppResult;
use crate::service::{JobHandle, ReportService};

/// Retrieve the completed report's CSV. The handle must belong to a job
/// already observed as not running.
#[tracing::instrument(
    name = "pipeline_stage fetch",
    skip(service),
    fields(pipeline.stage = "fetch", job.id = %handle, report.bytes)
)]
pub async fn fetch(service: &dyn ReportService, handle: &JobHandle) -> AppResult<String> {
    let csv = service.fetch_report_csv(handle).await?;

    tracing::Span::current().record("report.bytes", csv.len());
    tracing::info!(bytes = csv.len(), "report results fetched");

    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::pipeline::testing::ScriptedService;

    #[tokio::test]
    async fn test_fetch_returns_raw_csv() {
        let service = ScriptedService::completing("abc", 0, "a,b\n1,2\n");
        let csv = fetch(&service, &JobHandle::new("abc")).await.unwrap();
        assert_eq!(csv, "a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_fetch_propagates_service_errors() {
        let service = ScriptedService::failing_fetch(
            "abc",
            AppError::RemoteService("getReportResultCsv failed (500)".into()),
        );
        let err = fetch(&service, &JobHandle::new("abc")).await.unwrap_err();
        assert!(matches!(err, AppError::RemoteService(_)));
    }
}
