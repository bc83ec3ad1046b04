use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShelfError>;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parsing error: {0}")]
    Parse(String),
    #[error("Storage error: {0} {1}")]
    Storage(String, String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Store rejected the request: {0}")]
    Rejected(String),
    #[error("The client is already present: '{0}'")]
    DuplicateClient(String),
    #[error("Could not resolve profile '{0}': {1}")]
    Resolution(String, String),
    #[error("Detail service contract violated: {0}")]
    ContractViolation(String),
}

impl From<serde_json::Error> for ShelfError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<url::ParseError> for ShelfError {
    fn from(e: url::ParseError) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<std::num::ParseIntError> for ShelfError {
    fn from(e: std::num::ParseIntError) -> Self {
        Self::Parse(e.to_string())
    }
}
