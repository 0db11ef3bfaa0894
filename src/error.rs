use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the search provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Job submission rejected: {0}")]
    Rejected(String),

    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    #[error("Job {job_id} did not finish within {waited_secs}s")]
    JobTimeout { job_id: String, waited_secs: u64 },
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}

/// A batch whose last item carries no usable pagination cursor.
#[derive(Debug, Error, PartialEq)]
pub enum CursorError {
    #[error("no results to extract a cursor from")]
    EmptyBatch,

    #[error("malformed tweet_id in metadata: {0}")]
    Malformed(String),

    #[error("could not extract tweet_id from document {document_id:?}")]
    Missing { document_id: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum PaginationError {
    #[error("target count must be greater than 0")]
    InvalidTarget,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode collection for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode collection in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum TrendsError {
    #[error("failed to submit get trends job: {0}")]
    Submit(#[source] ProviderError),

    #[error("get trends job error: {0}")]
    Job(String),

    #[error("get trends job returned no job ID")]
    MissingJobId,

    #[error("failed to wait for trends job: {0}")]
    Wait(#[source] ProviderError),

    #[error("no trends returned")]
    Empty,
}

/// Failures that end a single-query run or a single topic.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("{0:?} has no filesystem-safe characters to build an output name from")]
    UnnamedOutput(String),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Trends(#[from] TrendsError),
}
