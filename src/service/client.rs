use reqwest::header::{CONTENT_TYPE, HeaderValue};

use crate::config::Credentials;
use crate::dates::TimeRange;
use crate::error::{AppError, AppResult};

use super::{JobHandle, ReportService, soap};

/// HTTPS client for the reporting service's admin endpoint. All three
/// operations POST an envelope to the same URL with basic authentication.
pub struct AdminApiClient {
    client: reqwest::Client,
    url: String,
    credentials: Credentials,
}

impl AdminApiClient {
    pub fn new(url: &str, credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            credentials,
        }
    }

    async fn call(&self, operation: &str, envelope: String) -> AppResult<String> {
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(CONTENT_TYPE, HeaderValue::from_static("text/xml"))
            .body(envelope)
            .send()
            .await
            .map_err(|e| AppError::Connection(format!("{operation} request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Protocol(format!("{operation} response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(AppError::RemoteService(format!(
                "{operation} failed ({status}): {body}"
            )));
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl ReportService for AdminApiClient {
    async fn submit_report(
        &self,
        folder: &str,
        report_name: &str,
        range: &TimeRange,
    ) -> AppResult<JobHandle> {
        let envelope = soap::run_report_envelope(folder, report_name, range);
        let body = self.call("runReport", envelope).await?;
        let identifier = soap::extract_result(&body)?;
        if identifier.is_empty() {
            return Err(AppError::Protocol(
                "submit response carried an empty job identifier".to_string(),
            ));
        }
        Ok(JobHandle::new(identifier))
    }

    async fn is_report_running(&self, handle: &JobHandle) -> AppResult<bool> {
        let envelope = soap::is_running_envelope(handle.as_str());
        let body = self.call("isReportRunning", envelope).await?;
        let flag = soap::extract_result(&body)?;
        Ok(flag.trim().eq_ignore_ascii_case("true"))
    }

    async fn fetch_report_csv(&self, handle: &JobHandle) -> AppResult<String> {
        let envelope = soap::result_csv_envelope(handle.as_str());
        let body = self.call("getReportResultCsv", envelope).await?;
        soap::extract_result(&body)
    }
}
