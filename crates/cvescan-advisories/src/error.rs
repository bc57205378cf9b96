use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("failed to deserialize NVD response: {0}")]
    DeserializationFailed(#[from] serde_json::Error),

    #[error("NVD API returned HTTP {0}")]
    ApiError(u16),

    #[error("request timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, AdvisoryError>;
