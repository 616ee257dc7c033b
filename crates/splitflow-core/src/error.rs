//! Coordinator error types with recoverability classification

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Installer Submission Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Install request rejected: {message}")]
    Submission { message: String },

    #[error("Update check failed: {message}")]
    UpdateCheck { message: String },

    #[error("Update is not allowed in any mode for this version")]
    UpdateNotAllowed,

    // ─────────────────────────────────────────────────────────────
    // Coordinator Lifecycle Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Installer report stream was already taken")]
    ReportStreamTaken,

    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,

    // ─────────────────────────────────────────────────────────────
    // Feature Registry Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No feature provider registered for module: {module}")]
    FeatureNotRegistered { module: String },

    #[error("Feature '{module}' failed to launch: {message}")]
    FeatureLaunch { module: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn submission(message: impl Into<String>) -> Self {
        Self::Submission {
            message: message.into(),
        }
    }

    pub fn update_check(message: impl Into<String>) -> Self {
        Self::UpdateCheck {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    pub fn feature_not_registered(module: impl Into<String>) -> Self {
        Self::FeatureNotRegistered {
            module: module.into(),
        }
    }

    pub fn feature_launch(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FeatureLaunch {
            module: module.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Recoverable errors leave the coordinator fully usable; the caller
    /// may simply retry the operation later.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Submission { .. }
                | Error::UpdateCheck { .. }
                | Error::UpdateNotAllowed
                | Error::ChannelSend { .. }
                | Error::FeatureNotRegistered { .. }
                | Error::FeatureLaunch { .. }
        )
    }

    /// Check if this error means the coordinator can no longer observe
    /// the installer and should be torn down.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ReportStreamTaken | Error::ChannelClosed)
    }
}
