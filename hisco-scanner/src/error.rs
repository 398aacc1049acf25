use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Page cache error: {0}")]
    CacheError(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Lookup failure: {0}")]
    LookupFailure(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
