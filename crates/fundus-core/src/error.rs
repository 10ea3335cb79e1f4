use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid access code: {0}")]
    InvalidAccessCode(String),

    #[error("rating {field} out of range: {value}")]
    RatingOutOfRange { field: &'static str, value: u8 },

    #[error("field {field} exceeds {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
}
