/// Convenience result type used across Graphyte.
pub type GraphyteResult<T> = Result<T, GraphyteError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GraphyteError {
    /// Invalid user-provided or composition data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed binary data in a packet stream, project file, or asset.
    #[error("codec error: {0}")]
    Codec(String),

    /// Errors while scheduling clip content onto the packet timeline.
    #[error("scheduling error: {0}")]
    Scheduling(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GraphyteError {
    /// Build a [`GraphyteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GraphyteError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`GraphyteError::Scheduling`] value.
    pub fn scheduling(msg: impl Into<String>) -> Self {
        Self::Scheduling(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
