use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallGraphError {
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("tree-sitter failed to construct a parser for C++")]
    GrammarInitFailed,

    #[error("no sources supplied")]
    NoSources,
}

pub type Result<T> = std::result::Result<T, CallGraphError>;
