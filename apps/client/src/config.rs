use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::store::CommitPolicy;

/// Passphrase used for the session blob when `SESSION_SECRET` is unset.
/// Shipped with the client, so it only obfuscates the stored session.
pub const DEFAULT_SESSION_SECRET: &str = "33Browntrucks!@#";
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub session_dir: PathBuf,
    pub session_secret: String,
    pub page_size: u32,
    pub http_timeout: Option<Duration>,
    pub commit_policy: CommitPolicy,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Parses configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .with_context(|| "Required environment variable 'API_BASE_URL' is not set")?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let page_size = match lookup("PAGE_SIZE") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .with_context(|| format!("PAGE_SIZE must be a positive integer, got '{raw}'"))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(
                raw.parse::<u64>()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS must be a number, got '{raw}'"))?,
            )),
            None => None,
        };

        let commit_policy = match lookup("COMMIT_POLICY").as_deref() {
            None | Some("last-settled") => CommitPolicy::LastSettled,
            Some("latest-issued") => CommitPolicy::LatestIssued,
            Some(other) => bail!(
                "COMMIT_POLICY must be 'last-settled' or 'latest-issued', got '{other}'"
            ),
        };

        Ok(Config {
            api_base_url,
            session_dir: lookup("SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".rizzource")),
            session_secret: lookup("SESSION_SECRET")
                .unwrap_or_else(|| DEFAULT_SESSION_SECRET.to_string()),
            page_size,
            http_timeout,
            commit_policy,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
