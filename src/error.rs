use std::path::PathBuf;
use thiserror::Error;

/// Why a single ticker could not be turned into a text file.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("no filings listed in response from {url}")]
    FilingsNotFound { url: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
