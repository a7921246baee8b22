use thiserror::Error;

#[derive(Debug, Error)]
pub enum TsuruError {
    #[error("TSURU_TARGET or TSURU_TOKEN envs not set")]
    MissingConfig,

    #[error("invalid tsuru target '{0}': must be an http or https URL")]
    InvalidTarget(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tsuru API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
