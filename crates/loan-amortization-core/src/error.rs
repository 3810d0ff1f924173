use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortizationError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AmortizationError {
    /// Field that failed validation, if this is an input error.
    pub fn field(&self) -> Option<&str> {
        match self {
            AmortizationError::InvalidInput { field, .. } => Some(field.as_str()),
            AmortizationError::SerializationError(_) => None,
        }
    }
}

impl From<serde_json::Error> for AmortizationError {
    fn from(e: serde_json::Error) -> Self {
        AmortizationError::SerializationError(e.to_string())
    }
}
