//! Error types for the catalog, download and reshape stages.

use thiserror::Error;

use crate::catalog::CatalogLevel;

/// Failure talking to the remote catalog over HTTP.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout or body read failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server returned status {0}")]
    Status(u16),

    /// The response body was not valid JSON
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    /// A resource path could not be joined onto the base URL
    #[error("invalid URL: {0}")]
    Url(String),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}

/// Why an export request did not produce a file.
#[derive(Debug, Error)]
pub enum DownloadFailure {
    #[error("status {status}: {excerpt}")]
    Status { status: u16, excerpt: String },

    #[error("{0}")]
    Transport(#[from] TransportError),
}

/// Failure while asking the operator (or a script) for a choice.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no {level} option matches `{wanted}`")]
    NoMatchingOption { level: CatalogLevel, wanted: String },

    #[error("`{0}` is not a date in YYYY-MM-DD form")]
    InvalidDate(String),

    #[error("input closed before a selection was made")]
    InputClosed,

    #[error("no {0} was given and there is no one to ask")]
    Unanswered(CatalogLevel),

    #[error("cannot select from an empty {0} list")]
    NothingToChoose(CatalogLevel),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Main error type for the pipeline.
#[derive(Debug, Error)]
pub enum WrisError {
    /// Transport or parse failure fetching a catalog level
    #[error("catalog unavailable while fetching {level}: {source}")]
    CatalogUnavailable {
        level: CatalogLevel,
        #[source]
        source: TransportError,
    },

    /// Catalog answered but offered nothing usable
    #[error("no {level} options returned by the catalog{}", dump_suffix(.body))]
    EmptyCatalog {
        level: CatalogLevel,
        body: Option<String>,
    },

    /// A level was queried before the codes it depends on were resolved
    #[error("cannot query {level} before its parent levels are resolved")]
    MissingParent { level: CatalogLevel },

    #[error("download failed: {0}")]
    DownloadFailed(#[from] DownloadFailure),

    /// Input table lacks columns the reshape needs
    #[error("input is missing required column(s): {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("failed to read or write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn dump_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!("; response dump:\n{}", body),
        None => String::new(),
    }
}

/// Type alias for Results using WrisError
pub type Result<T> = std::result::Result<T, WrisError>;
