use crate::dates::TimeRange;
use crate::error::AppResult;
use crate::service::{JobHandle, ReportService};

/// Replace typographic dash and quote variants with their canonical ASCII
/// forms. The reporting service rejects names containing the variants even
/// when the stored report carries them.
pub fn sanitize_report_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

#[tracing::instrument(
    name = "pipeline_stage submit",
    skip(service, range),
    fields(pipeline.stage = "submit", job.id)
)]
pub async fn submit(
    service: &dyn ReportService,
    folder: &str,
    report_name: &str,
    range: &TimeRange,
) -> AppResult<JobHandle> {
    let normalized = sanitize_report_name(report_name);
    let handle = service.submit_report(folder, &normalized, range).await?;

    tracing::Span::current().record("job.id", handle.as_str());
    tracing::info!(job.id = %handle, "report submitted");

    Ok(handle)
}
