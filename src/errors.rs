use thiserror::Error;

pub type Result<T> = std::result::Result<T, SableError>;

#[derive(Debug, Error)]
pub enum SableError {
    #[error("Parsing error: {0}")]
    SerdeParse(#[from] serde_json::error::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid matcher pattern: {0}")]
    BadPattern(#[from] regex::Error),
    #[error("Unknown key name: {0}")]
    UnknownKey(String),
    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),
    #[error("Empty grab spec")]
    EmptyGrab,
    #[error("Duplicate grab: {0}")]
    DuplicateGrab(String),
    #[error("Cannot remove the last view")]
    LastView,
    #[error("No such entity: {0}")]
    NotFound(&'static str),
    #[error("A config must define at least one gravity and one view")]
    IncompleteModel,
}
