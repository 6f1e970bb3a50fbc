use std::env;

use crate::error::{AppError, AppResult};

/// Reporting-service credentials as a structured value. The external
/// `user:pass` combined form is parsed here, once, at the configuration
/// boundary.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn parse(combined: &str) -> AppResult<Self> {
        let (username, password) = combined.split_once(':').ok_or_else(|| {
            AppError::Config("credentials must be in \"username:password\" form".to_string())
        })?;
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Config(
                "credentials must be in \"username:password\" form".to_string(),
            ));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Optional SFTP relay destination. Absent when any of host, username, or
/// password is unset; upload is then disabled, not an error.
#[derive(Debug, Clone)]
pub struct RelayTarget {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub remote_path: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub service_url: String,
    pub relay: Option<RelayTarget>,
}

const DEFAULT_SERVICE_URL: &str = "https://api.five9.com/wsadmin/v13/AdminWebService";

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_env_with(None)
    }

    /// Like `from_env`, with a caller-supplied credential override (the CLI
    /// flag) taking precedence over the environment.
    pub fn from_env_with(credentials: Option<Credentials>) -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let credentials = match credentials {
            Some(credentials) => credentials,
            None => Self::credentials_from_env()?,
        };

        let service_url =
            env::var("REPORT_API_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());

        Ok(Self {
            credentials,
            service_url,
            relay: relay_from_env()?,
        })
    }

    fn credentials_from_env() -> AppResult<Credentials> {
        match env::var("REPORT_API_CREDENTIALS") {
            Ok(combined) => Credentials::parse(&combined),
            Err(_) => {
                let username = env::var("REPORT_API_USERNAME").map_err(|_| {
                    AppError::Config(
                        "REPORT_API_USERNAME and REPORT_API_PASSWORD (or REPORT_API_CREDENTIALS) \
                         must be set"
                            .to_string(),
                    )
                })?;
                let password = env::var("REPORT_API_PASSWORD").map_err(|_| {
                    AppError::Config(
                        "REPORT_API_USERNAME and REPORT_API_PASSWORD (or REPORT_API_CREDENTIALS) \
                         must be set"
                            .to_string(),
                    )
                })?;
                Ok(Credentials { username, password })
            }
        }
    }
}

fn relay_from_env() -> AppResult<Option<RelayTarget>> {
    let host = env::var("RELAY_HOST").ok();
    let username = env::var("RELAY_USERNAME").ok();
    let password = env::var("RELAY_PASSWORD").ok();

    let (Some(host), Some(username), Some(password)) = (host, username, password) else {
        return Ok(None);
    };

    let port = match env::var("RELAY_PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("RELAY_PORT must be a number, got {raw:?}")))?,
        Err(_) => 22,
    };
    let remote_path = env::var("RELAY_PATH").unwrap_or_else(|_| "/".to_string());

    Ok(Some(RelayTarget {
        host,
        port,
        username,
        password,
        remote_path,
    }))
}
