use thiserror::Error;

use crate::field::UnknownField;

#[derive(Debug, Error)]
pub enum Error {
    /// reading or writing the backing storage file failed
    #[error("storage error: {0}")]
    Storage(#[from] confy::ConfyError),

    #[error("could not determine a config directory for this platform")]
    NoConfigDir,

    #[error("failed to encode prayer offsets: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("expected FIELD=VALUE, got `{0}`")]
    UnknownAssignment(String),

    #[error("`{value}` is not a whole number for `{field}`")]
    InvalidValue { field: String, value: String },

    #[error(transparent)]
    UnknownField(#[from] UnknownField),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
