//! Error types for whenny-core.
//!
//! This module defines the error types used throughout the library,
//! with specific error categories for date coercion, timezone handling,
//! transfer payloads, and configuration lookups.

use thiserror::Error;

/// The main error type for whenny operations.
#[derive(Debug, Error)]
pub enum WhennyError {
    /// Input could not be coerced into a valid instant.
    #[error("Invalid date input: {0}")]
    InvalidDateInput(String),

    /// Timezone name rejected by the host timezone facility.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Transfer payload is structurally malformed or semantically invalid.
    #[error("Invalid transfer payload: {0}")]
    InvalidTransferPayload(String),

    /// Caller requested a format preset that is not configured.
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// Caller addressed a configuration section that does not exist.
    #[error("Unknown config section: {0}")]
    UnknownModule(String),

    /// A recognized configuration section carried a malformed body.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl WhennyError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            WhennyError::InvalidDateInput(_) => "invalid_date_input",
            WhennyError::InvalidTimezone(_) => "invalid_timezone",
            WhennyError::InvalidTransferPayload(_) => "invalid_transfer_payload",
            WhennyError::UnknownPreset(_) => "unknown_preset",
            WhennyError::UnknownModule(_) => "unknown_module",
            WhennyError::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Result type alias for whenny operations.
pub type Result<T> = std::result::Result<T, WhennyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            WhennyError::InvalidDateInput("x".into()).code(),
            "invalid_date_input"
        );
        assert_eq!(
            WhennyError::InvalidTimezone("x".into()).code(),
            "invalid_timezone"
        );
        assert_eq!(
            WhennyError::UnknownPreset("x".into()).code(),
            "unknown_preset"
        );
    }

    #[test]
    fn error_messages_carry_hints() {
        let err = WhennyError::InvalidTimezone("Mars/Olympus".into());
        assert_eq!(err.to_string(), "Invalid timezone: Mars/Olympus");
    }
}
