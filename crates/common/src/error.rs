//! Error types shared across FaceSnap crates.

/// Top-level error type for FaceSnap operations.
#[derive(Debug, thiserror::Error)]
pub enum FaceSnapError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Platform error: {message}")]
    Platform { message: String },

    #[error("Cannot {action} while in the {state} screen")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("Busy: {message}")]
    Busy { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FaceSnapError.
pub type FaceSnapResult<T> = Result<T, FaceSnapError>;

impl FaceSnapError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy {
            message: msg.into(),
        }
    }

    /// Whether the failure is worth retrying as-is (no input change needed).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Render { .. } | Self::Detection { .. } | Self::Busy { .. } | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = FaceSnapError::invalid_input("notes.txt is not a video");
        assert_eq!(err.to_string(), "Invalid input: notes.txt is not a video");

        let err = FaceSnapError::InvalidTransition {
            state: "upload",
            action: "capture",
        };
        assert_eq!(err.to_string(), "Cannot capture while in the upload screen");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(FaceSnapError::render("surface unavailable").is_retryable());
        assert!(FaceSnapError::busy("detection in flight").is_retryable());
        assert!(!FaceSnapError::invalid_input("bad").is_retryable());
    }
}
