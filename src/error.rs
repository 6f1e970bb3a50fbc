use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Remote service error: {0}")]
    RemoteService(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Report timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
