pub mod fetch;
pub mod orchestrator;
pub mod persist;
pub mod poll;
pub mod submit;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::dates::TimeRange;
    use crate::error::{AppError, AppResult};
    use crate::service::{JobHandle, ReportService};

    pub fn test_range() -> TimeRange {
        TimeRange {
            start: "2025-03-07T00:00:00.000-05:00".to_string(),
            end: "2025-03-14T23:59:59.000-05:00".to_string(),
        }
    }

    /// Reporting-service double driven by a scripted status sequence. Once
    /// the sequence is exhausted it keeps answering `exhausted_status`.
    pub struct ScriptedService {
        submit_result: Mutex<Option<AppResult<JobHandle>>>,
        statuses: Mutex<VecDeque<AppResult<bool>>>,
        exhausted_status: bool,
        csv_result: Mutex<Option<AppResult<String>>>,
        pub submitted_names: Mutex<Vec<String>>,
        pub status_checks: AtomicUsize,
    }

    impl ScriptedService {
        /// A job that reports "running" `running_polls` times, then
        /// completes with the given CSV body.
        pub fn completing(id: &str, running_polls: usize, csv: &str) -> Self {
            let mut statuses = VecDeque::new();
            for _ in 0..running_polls {
                statuses.push_back(Ok(true));
            }
            statuses.push_back(Ok(false));
            Self {
                submit_result: Mutex::new(Some(Ok(JobHandle::new(id)))),
                statuses: Mutex::new(statuses),
                exhausted_status: false,
                csv_result: Mutex::new(Some(Ok(csv.to_string()))),
                submitted_names: Mutex::new(Vec::new()),
                status_checks: AtomicUsize::new(0),
            }
        }

        pub fn never_finishing(id: &str) -> Self {
            Self {
                submit_result: Mutex::new(Some(Ok(JobHandle::new(id)))),
                statuses: Mutex::new(VecDeque::new()),
                exhausted_status: true,
                csv_result: Mutex::new(None),
                submitted_names: Mutex::new(Vec::new()),
                status_checks: AtomicUsize::new(0),
            }
        }

        pub fn failing_submit(err: AppError) -> Self {
            Self {
                submit_result: Mutex::new(Some(Err(err))),
                statuses: Mutex::new(VecDeque::new()),
                exhausted_status: false,
                csv_result: Mutex::new(None),
                submitted_names: Mutex::new(Vec::new()),
                status_checks: AtomicUsize::new(0),
            }
        }

        pub fn failing_fetch(id: &str, err: AppError) -> Self {
            let service = Self::completing(id, 0, "");
            *service.csv_result.lock().unwrap() = Some(Err(err));
            service
        }
    }

    #[async_trait::async_trait]
    impl ReportService for ScriptedService {
        async fn submit_report(
            &self,
            _folder: &str,
            report_name: &str,
            _range: &TimeRange,
        ) -> AppResult<JobHandle> {
            self.submitted_names
                .lock()
                .unwrap()
                .push(report_name.to_string());
            self.submit_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(JobHandle::new("unscripted")))
        }

        async fn is_report_running(&self, _handle: &JobHandle) -> AppResult<bool> {
            self.status_checks.fetch_add(1, Ordering::SeqCst);
            self.statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(self.exhausted_status))
        }

        async fn fetch_report_csv(&self, _handle: &JobHandle) -> AppResult<String> {
            self.csv_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }
}
