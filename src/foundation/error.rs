/// Convenience result type used across the crate.
pub type PixooResult<T> = Result<T, PixooError>;

/// Top-level error taxonomy used by the library APIs.
///
/// Device-reported error codes are deliberately absent: a non-zero `error_code`
/// or `ReturnCode` is logged and recorded in the session state, never raised.
#[derive(thiserror::Error, Debug)]
pub enum PixooError {
    /// Invalid caller-provided data (sizes, ids, buffers, configuration).
    #[error("validation error: {0}")]
    Validation(String),

    /// HTTP-level failure: connection refused, DNS, non-2xx status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Source imagery could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A response or config document did not match its declared schema.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixooError {
    /// Build a [`PixooError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixooError::Transport`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Build a [`PixooError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PixooError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
