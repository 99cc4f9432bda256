//! Error types for the serial transport

use simtrip_apdu_core::{Error, TransportError};

/// Serial transport errors
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    /// The serial port could not be opened or configured
    #[error("Serial port error: {0}")]
    Port(#[from] serialport::Error),

    /// I/O failure on an open port
    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No answer to reset, the reader is empty
    #[error("No card present")]
    NoCard,

    /// The card stopped answering mid-exchange
    #[error("Card did not answer in time")]
    Timeout,

    /// The echo of a transmitted byte did not match
    #[error("Bad echo value (expected {expected:02x}, got {got})")]
    BadEcho {
        /// Byte that was sent
        expected: u8,
        /// Byte that came back, if any
        got: String,
    },

    /// The card answered something T=0 does not allow here
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The command cannot be sent over T=0
    #[error("Invalid command: {0}")]
    InvalidCommand(&'static str),
}

impl From<SerialError> for TransportError {
    fn from(error: SerialError) -> Self {
        match error {
            SerialError::NoCard => Self::NoCard,
            SerialError::Timeout => Self::Timeout,
            SerialError::Port(_) => Self::Connection,
            SerialError::Io(_)
            | SerialError::BadEcho { .. }
            | SerialError::Protocol(_)
            | SerialError::InvalidCommand(_) => Self::Other(error.to_string()),
        }
    }
}

impl From<SerialError> for Error {
    fn from(error: SerialError) -> Self {
        Self::Transport(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_to_transport_error() {
        assert!(TransportError::from(SerialError::NoCard).is_no_card());
        assert!(matches!(
            TransportError::from(SerialError::Timeout),
            TransportError::Timeout
        ));

        let err = TransportError::from(SerialError::BadEcho {
            expected: 0xA0,
            got: "(nil)".into(),
        });
        assert_eq!(err.to_string(), "Bad echo value (expected a0, got (nil))");
    }
}
