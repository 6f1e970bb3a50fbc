use std::path::{Path, PathBuf};

use crate::error::AppResult;

/// Applied in order. A `#` absorbs the space before it, so `"Log #1"`
/// becomes `lognum1` rather than `log_num1`.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    (" #", "num"),
    ("#", "num"),
    ("/", "-"),
    ("\u{2013}", "-"),
    ("&", "and"),
    ("%", "pct"),
    ("(", ""),
    (")", ""),
    (" ", "_"),
];

/// Derive a filesystem-safe file name from a report name: lowercase, apply
/// the substitution table, strip everything that is not alphanumeric, `_`,
/// or `-`, then suffix the timestamp and extension.
pub fn make_file_name(report_name: &str, timestamp: &str) -> String {
    let mut stem = report_name.to_lowercase();
    for (from, to) in SUBSTITUTIONS {
        stem = stem.replace(from, to);
    }
    stem.retain(|c| c.is_alphanumeric() || c == '_' || c == '-');
    format!("{stem}_{timestamp}.csv")
}

/// Write the fetched content verbatim to a uniquely named file in the run's
/// output directory. Returns the full path.
#[tracing::instrument(
    name = "pipeline_stage persist",
    skip(output_dir, content),
    fields(pipeline.stage = "persist", report.path)
)]
pub fn persist(output_dir: &Path, report_name: &str, content: &str) -> AppResult<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let path = output_dir.join(make_file_name(report_name, &timestamp));

    std::fs::write(&path, content)?;

    tracing::Span::current().record("report.path", path.display().to_string());
    tracing::info!(path = %path.display(), bytes = content.len(), "report persisted");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_make_file_name_call_log() {
        assert_eq!(
            make_file_name("Call Log #1 (daily)", "20250314_103015"),
            "call_lognum1_daily_20250314_103015.csv"
        );
    }

    #[test]
    fn test_make_file_name_substitution_table() {
        assert_eq!(
            make_file_name("Queue A/B \u{2013} P&L 95%", "ts"),
            "queue_a-b_-_pandl_95pct_ts.csv"
        );
    }

    #[test]
    fn test_make_file_name_strips_leftover_punctuation() {
        assert_eq!(make_file_name("Agent's Log!", "ts"), "agents_log_ts.csv");
    }

    #[test]
    fn test_persist_writes_content_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = persist(dir.path(), "Call Log", "a,b\n1,2\n").unwrap();

        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("call_log_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn test_persist_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = persist(&missing, "Call Log", "data").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
