use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::config::RelayTarget;
use crate::dates::TimeRange;
use crate::error::AppResult;
use crate::service::ReportService;

use super::poll::PollConfig;
use super::upload::Uploader;
use super::{fetch, persist, poll, submit};

/// One unit of work: a named report in a folder over a time range.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub name: String,
    pub folder: String,
    pub range: TimeRange,
}

/// Terminal state of one job. A relay failure is attached as `upload_error`
/// and never demotes a `Success`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum JobOutcome {
    Success {
        file_path: PathBuf,
        duration_seconds: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        upload_error: Option<String>,
    },
    Failure {
        error: String,
    },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResult {
    pub report: String,
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

/// Aggregate built incrementally over the run and returned to the caller.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub results: Vec<ReportResult>,
    pub successful: usize,
    pub failed: usize,
    pub total_duration_seconds: f64,
}

impl RunResult {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

pub struct RunParams<'a> {
    pub service: &'a dyn ReportService,
    pub uploader: &'a dyn Uploader,
    pub relay: Option<&'a RelayTarget>,
    pub poll: PollConfig,
    pub output_base: &'a Path,
}

/// Run every request strictly in order. A job's failure is converted into a
/// `Failure` outcome at the job boundary and never stops later jobs; only
/// creating the run's output directory can fail the run as a whole.
pub async fn run_reports(
    params: &RunParams<'_>,
    requests: &[ReportRequest],
) -> AppResult<RunResult> {
    let run_started = Instant::now();
    let output_dir = create_output_directory(params.output_base)?;

    tracing::info!(
        output_dir = %output_dir.display(),
        total = requests.len(),
        "starting report run"
    );

    let mut results = Vec::with_capacity(requests.len());
    let mut successful = 0;
    let mut failed = 0;

    for (index, request) in requests.iter().enumerate() {
        tracing::info!(
            report = %request.name,
            folder = %request.folder,
            index = index + 1,
            total = requests.len(),
            "processing report"
        );

        let outcome = run_single_report(params, &output_dir, request).await;
        match &outcome {
            JobOutcome::Success { file_path, .. } => {
                successful += 1;
                tracing::info!(report = %request.name, path = %file_path.display(), "report succeeded");
            }
            JobOutcome::Failure { error } => {
                failed += 1;
                tracing::error!(report = %request.name, error = %error, "report failed");
            }
        }

        results.push(ReportResult {
            report: request.name.clone(),
            outcome,
        });
    }

    Ok(RunResult {
        output_dir,
        results,
        successful,
        failed,
        total_duration_seconds: run_started.elapsed().as_secs_f64(),
    })
}

async fn run_single_report(
    params: &RunParams<'_>,
    output_dir: &Path,
    request: &ReportRequest,
) -> JobOutcome {
    let started = Instant::now();

    let persisted = async {
        let handle =
            submit::submit(params.service, &request.folder, &request.name, &request.range).await?;
        poll::poll_until_complete(params.service, &handle, &params.poll, |elapsed| {
            tracing::info!(elapsed_secs = elapsed.as_secs(), "report still running");
        })
        .await?;
        let csv = fetch::fetch(params.service, &handle).await?;
        persist::persist(output_dir, &request.name, &csv)
    }
    .await;

    match persisted {
        Ok(file_path) => {
            let upload_error = match params.relay {
                Some(target) => params
                    .uploader
                    .upload(&file_path, target)
                    .await
                    .err()
                    .map(|e| {
                        tracing::warn!(error = %e, "relay upload failed");
                        e.to_string()
                    }),
                None => None,
            };

            JobOutcome::Success {
                file_path,
                duration_seconds: started.elapsed().as_secs_f64(),
                upload_error,
            }
        }
        Err(err) => JobOutcome::Failure {
            error: err.to_string(),
        },
    }
}

fn create_output_directory(base: &Path) -> AppResult<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let dir = base.join(format!("call_reports_{timestamp}"));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
