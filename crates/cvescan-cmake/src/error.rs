use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmakeError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CmakeError>;
