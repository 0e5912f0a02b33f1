//! Error types for interaction handling.
//!
//! Errors are split into recoverable kinds, answered with a 400 and their own
//! message, and faults, answered with a 500 and a fixed message.

use axum::http::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::interaction::InteractionType;

/// Body returned for every unexpected fault.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error.";

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("The body is not an Interaction structure.")]
    NotAnInteraction,

    #[error("The type of interaction was unexpected: {0}.")]
    UnsupportedInteraction(InteractionType),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl InteractionError {
    /// Whether the error is a client mistake rather than a fault.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            InteractionError::NotAnInteraction | InteractionError::UnsupportedInteraction(_)
        )
    }

    pub fn status(&self) -> StatusCode {
        if self.is_expected() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Text sent back to the caller. Faults never expose their details.
    pub fn message(&self) -> String {
        if self.is_expected() {
            self.to_string()
        } else {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        }
    }
}

impl From<serde_json::Error> for InteractionError {
    fn from(err: serde_json::Error) -> Self {
        InteractionError::Internal(err.into())
    }
}
