use thiserror::Error;

#[derive(Debug, Error)]
pub enum SirenError {
    #[error("missing field: {0}")]
    MissingField(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("notify error: {0}")]
    Notify(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SirenError>;
