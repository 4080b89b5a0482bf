//! Error types for the driver boundary.

use thiserror::Error;

/// Driver error enumeration.
#[derive(Debug, Error, Clone)]
pub enum DriverError {
    /// The automation session became invalid; a restart is required before
    /// further commands.
    #[error("session invalid: {0}")]
    SessionInvalid(String),

    /// Command transport failure (connection, timeout, malformed reply).
    #[error("driver transport error: {0}")]
    Transport(String),

    /// No real driver is wired in this build.
    #[error("driver unavailable: {0}")]
    Unavailable(String),
}

impl DriverError {
    /// Classify a raw server message; invalid-session signals get their own
    /// variant so callers can trigger a reconnect.
    pub fn from_wire(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("InvalidSessionId") || message.contains("invalid session") {
            Self::SessionInvalid(message)
        } else {
            Self::Transport(message)
        }
    }

    /// Whether this error should trigger a session restart.
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, Self::SessionInvalid(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire_classification() {
        assert!(DriverError::from_wire("InvalidSessionIdException: gone").is_session_invalid());
        assert!(DriverError::from_wire("invalid session id").is_session_invalid());
        assert!(!DriverError::from_wire("socket hang up").is_session_invalid());
    }
}
