//! Per-icon fetch error, classified by the retry policy.

use thiserror::Error;

/// Why a single icon could not be saved. Always non-fatal for the batch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (bad URL, DNS, connect, timeout, ...).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The final response status was not 200.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing or renaming the icon file failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}

impl FetchError {
    /// HTTP status if the server answered with a non-200 code.
    pub fn status(&self) -> Option<u32> {
        match self {
            FetchError::Http(code) => Some(*code),
            _ => None,
        }
    }
}
