use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

mod config;
mod dates;
mod error;
mod pipeline;
mod service;
mod telemetry;

use config::Config;
use dates::ReportWindow;
use pipeline::orchestrator::{self, JobOutcome, ReportRequest, RunParams, RunResult};
use pipeline::poll::PollConfig;
use pipeline::upload::SftpUploader;
use service::AdminApiClient;

/// Fetch call-center reports: submit, wait for generation, persist the CSV,
/// and optionally relay it over SFTP.
#[derive(Parser, Debug)]
#[command(name = "call-report-runner", version)]
struct Cli {
    /// Report name to run; repeat the flag to run several reports in order
    #[arg(long = "report", default_values_t = [String::from("Call Log")])]
    reports: Vec<String>,

    /// Folder the reports live in
    #[arg(long, default_value = "Shared Reports")]
    folder: String,

    /// Time range to run the reports over
    #[arg(long, value_enum, default_value_t = ReportWindow::LastWeek)]
    window: ReportWindow,

    /// Polling budget per report, in seconds
    #[arg(long, default_value_t = 300)]
    timeout_secs: u64,

    /// Delay between status checks, in seconds
    #[arg(long, default_value_t = 5)]
    poll_interval_secs: u64,

    /// Base directory for the per-run output directory
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the run summary as JSON instead of the human-readable form
    #[arg(long)]
    json: bool,

    /// Reporting credentials as "username:password"; overrides the environment
    #[arg(long)]
    credentials: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry();

    let override_credentials = cli
        .credentials
        .as_deref()
        .map(config::Credentials::parse)
        .transpose()?;
    let config = Config::from_env_with(override_credentials)?;
    let range = cli.window.range();

    tracing::info!(
        window = ?cli.window,
        start = %range.start,
        end = %range.end,
        reports = cli.reports.len(),
        "starting call-report-runner"
    );
    match &config.relay {
        Some(relay) => {
            tracing::info!(host = %relay.host, port = relay.port, path = %relay.remote_path, "relay upload enabled");
        }
        None => tracing::info!("relay upload disabled (no relay configuration)"),
    }

    let service = AdminApiClient::new(&config.service_url, config.credentials.clone());
    let uploader = SftpUploader;

    let requests: Vec<ReportRequest> = cli
        .reports
        .iter()
        .map(|name| ReportRequest {
            name: name.clone(),
            folder: cli.folder.clone(),
            range: range.clone(),
        })
        .collect();

    let result = orchestrator::run_reports(
        &RunParams {
            service: &service,
            uploader: &uploader,
            relay: config.relay.as_ref(),
            poll: PollConfig {
                timeout: Duration::from_secs(cli.timeout_secs),
                interval: Duration::from_secs(cli.poll_interval_secs),
            },
            output_base: &cli.output_dir,
        },
        &requests,
    )
    .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if !result.all_succeeded() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(result: &RunResult) {
    println!("\n=== Run Summary ===");
    println!("Output directory: {}", result.output_dir.display());
    println!("Total reports: {}", result.results.len());
    println!("Successful: {}", result.successful);
    println!("Failed: {}", result.failed);
    println!("Total duration: {:.1} seconds", result.total_duration_seconds);

    for entry in &result.results {
        println!("\nReport: {}", entry.report);
        match &entry.outcome {
            JobOutcome::Success {
                file_path,
                duration_seconds,
                upload_error,
            } => {
                println!("Status: Success");
                println!("Duration: {duration_seconds:.1} seconds");
                println!("Output: {}", file_path.display());
                if let Some(warning) = upload_error {
                    println!("Upload warning: {warning}");
                }
            }
            JobOutcome::Failure { error } => {
                println!("Status: Failed");
                println!("Error: {error}");
            }
        }
    }
}
