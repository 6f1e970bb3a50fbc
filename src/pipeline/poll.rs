use std::time::Duration;

use tokio::time::Instant;

use crate::error::{AppError, AppResult};
use crate::service::{JobHandle, ReportService};

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Wall-clock budget for the whole wait.
    pub timeout: Duration,
    /// Fixed delay between status checks. No backoff; the fixed interval
    /// bounds total load on the remote service.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            interval: Duration::from_secs(5),
        }
    }
}

/// Wait until the job stops running. Elapsed time is recomputed on every
/// iteration and reported through `on_progress` before each sleep, so
/// operators see the wait advancing.
#[tracing::instrument(
    name = "pipeline_stage poll",
    skip(service, on_progress),
    fields(pipeline.stage = "poll", job.id = %handle)
)]
pub async fn poll_until_complete(
    service: &dyn ReportService,
    handle: &JobHandle,
    config: &PollConfig,
    mut on_progress: impl FnMut(Duration),
) -> AppResult<()> {
    let started = Instant::now();

    loop {
        if !service.is_report_running(handle).await? {
            tracing::info!(elapsed_secs = started.elapsed().as_secs(), "report completed");
            return Ok(());
        }

        let elapsed = started.elapsed();
        if elapsed >= config.timeout {
            return Err(AppError::Timeout {
                seconds: config.timeout.as_secs(),
            });
        }

        on_progress(elapsed);
        tokio::time::sleep(config.interval).await;
    }
}
