use std::io::Write;
use std::net::TcpStream;
use std::path::{Path, PathBuf};

use ssh2::Session;

use crate::config::RelayTarget;
use crate::error::{AppError, AppResult};

/// Seam for the relay transfer so outcomes can be exercised without a live
/// SFTP server.
#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, local_file: &Path, target: &RelayTarget) -> AppResult<()>;
}

/// SFTP relay over `ssh2`. The library is blocking, so the transfer runs on
/// the blocking pool; one session per upload, never reused.
pub struct SftpUploader;

#[async_trait::async_trait]
impl Uploader for SftpUploader {
    #[tracing::instrument(
        name = "pipeline_stage upload",
        skip(self, target),
        fields(pipeline.stage = "upload", relay.host = %target.host)
    )]
    async fn upload(&self, local_file: &Path, target: &RelayTarget) -> AppResult<()> {
        let local_file: PathBuf = local_file.to_path_buf();
        let target = target.clone();

        tokio::task::spawn_blocking(move || upload_blocking(&local_file, &target))
            .await
            .map_err(|e| AppError::Transfer(format!("upload task failed: {e}")))?
    }
}

fn upload_blocking(local_file: &Path, target: &RelayTarget) -> AppResult<()> {
    let tcp = TcpStream::connect((target.host.as_str(), target.port)).map_err(|e| {
        AppError::Connection(format!("cannot reach {}:{}: {e}", target.host, target.port))
    })?;

    // Session drop closes the transport on success and failure paths alike.
    let mut session = Session::new()
        .map_err(|e| AppError::Connection(format!("ssh session setup failed: {e}")))?;
    session.set_tcp_stream(tcp);
    session
        .handshake()
        .map_err(|e| AppError::Connection(format!("handshake with {} failed: {e}", target.host)))?;

    session
        .userauth_password(&target.username, &target.password)
        .map_err(|e| {
            AppError::Authentication(format!(
                "{}@{} rejected credentials: {e}",
                target.username, target.host
            ))
        })?;

    let sftp = session
        .sftp()
        .map_err(|e| AppError::Transfer(format!("sftp channel failed: {e}")))?;

    // Check-then-create is best-effort and not atomic; uploads run
    // sequentially, so the race is benign.
    let remote_dir = Path::new(&target.remote_path);
    if sftp.stat(remote_dir).is_err() {
        tracing::info!(path = %target.remote_path, "remote directory absent, creating");
        sftp.mkdir(remote_dir, 0o755).map_err(|e| {
            AppError::Transfer(format!("cannot create {}: {e}", target.remote_path))
        })?;
    }

    let base_name = local_file
        .file_name()
        .ok_or_else(|| AppError::Transfer(format!("no file name in {}", local_file.display())))?;
    let remote_file = remote_dir.join(base_name);

    let bytes = std::fs::read(local_file)?;
    // `create` truncates, so an existing remote file is overwritten.
    let mut remote = sftp
        .create(&remote_file)
        .map_err(|e| AppError::Transfer(format!("cannot open {}: {e}", remote_file.display())))?;
    remote
        .write_all(&bytes)
        .map_err(|e| AppError::Transfer(format!("write to {} failed: {e}", remote_file.display())))?;

    tracing::info!(
        remote = %remote_file.display(),
        bytes = bytes.len(),
        "report uploaded"
    );

    Ok(())
}
