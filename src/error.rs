use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while resolving sports and fetching reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report store answered with a non-success status.
    #[error("Request failed: {status} for {url}")]
    RequestFailed { status: StatusCode, url: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode report from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown sport: {0}")]
    UnknownSport(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
