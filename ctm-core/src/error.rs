use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("ring mismatch: {left} vs {right}")]
    RingMismatch { left: String, right: String },

    #[error("not homogeneous: {0}")]
    NonHomogeneous(String),

    #[error("idempotent mismatch: {0}")]
    IdempotentMismatch(String),

    #[error("duplicate generator: {0}")]
    DuplicateGenerator(String),

    #[error("unknown generator: {0}")]
    UnknownGenerator(String),

    #[error("invalid strands: {0}")]
    InvalidStrands(String),

    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    #[error("sign mismatch: {0}")]
    SignMismatch(String),

    #[error("parse error: {0}")]
    Parse(String),
}
