/// Convenience result alias used across paccard APIs.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error type returned by paccard.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Input or configuration failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// A capture host operation failed.
    #[error("capture error: {0}")]
    Capture(#[from] crate::export::capture::CaptureError),

    /// The encoder process failed or produced unusable output.
    #[error("encode error: {0}")]
    Encode(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Filesystem or pipe I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CardError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
