use std::time::Duration;

use reqwest::Url;

use crate::{Result, TsuruError};

pub const TARGET_ENV: &str = "TSURU_TARGET";
pub const TOKEN_ENV: &str = "TSURU_TOKEN";

/// Timeout for every request except the streamed container move.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// TsuruConfig
// ---------------------------------------------------------------------------

/// Where the tsuru API lives and how to authenticate against it.
///
/// Validated once at construction; a `TsuruConfig` value is always usable.
#[derive(Debug, Clone)]
pub struct TsuruConfig {
    target: String,
    token: String,
    pub request_timeout: Duration,
}

impl TsuruConfig {
    pub fn new(target: Option<String>, token: Option<String>) -> Result<Self> {
        let target = non_blank(target).ok_or(TsuruError::MissingConfig)?;
        let token = non_blank(token).ok_or(TsuruError::MissingConfig)?;

        let parsed = Url::parse(&target).map_err(|_| TsuruError::InvalidTarget(target.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(TsuruError::InvalidTarget(target));
        }

        let target = target.strip_suffix('/').unwrap_or(&target).to_string();
        Ok(Self {
            target,
            token,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Read `TSURU_TARGET` and `TSURU_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::new(
            std::env::var(TARGET_ENV).ok(),
            std::env::var(TOKEN_ENV).ok(),
        )
    }

    /// API base URL without a trailing slash.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
