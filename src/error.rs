use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog Error: {0}")]
    Catalog(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Transport Error: {0}")]
    Transport(String),
}

pub type LfResult<T> = Result<T, LedgerError>;
