use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Fetch failed for {location}: {reason}")]
    Fetch { location: String, reason: String },

    #[error("Parse failed for {location}: {reason}")]
    Parse { location: String, reason: String },

    #[error("No records in corpus")]
    EmptyCorpus,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch { location: location.into(), reason: reason.to_string() }
    }

    pub fn parse(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse { location: location.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
