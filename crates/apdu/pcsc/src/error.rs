//! Error types for PC/SC transport

use simtrip_apdu_core::{Error, TransportError};

/// PC/SC-specific errors
#[derive(Debug, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("No readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// Reader index outside of the reader list
    #[error("Reader index {index} out of range ({available} readers available)")]
    ReaderIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of readers PC/SC reported
        available: usize,
    },

    /// No card present in reader
    #[error("No card present in reader: {0}")]
    NoCard(String),

    /// Card was removed
    #[error("Card was removed")]
    CardRemoved,

    /// Gave up waiting for a card
    #[error("Timed out waiting for a card in reader: {0}")]
    Timeout(String),
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::NoCard(_) | PcscError::CardRemoved => Self::NoCard,
            PcscError::Pcsc(pcsc::Error::NoSmartcard | pcsc::Error::RemovedCard) => Self::NoCard,
            PcscError::Timeout(_) | PcscError::Pcsc(pcsc::Error::Timeout) => Self::Timeout,
            PcscError::NoReadersAvailable
            | PcscError::ReaderNotFound(_)
            | PcscError::ReaderIndexOutOfRange { .. } => Self::Other(error.to_string()),
            PcscError::Pcsc(_) => Self::Other(error.to_string()),
        }
    }
}

impl From<PcscError> for Error {
    fn from(error: PcscError) -> Self {
        Self::Transport(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_mapping() {
        assert!(TransportError::from(PcscError::NoCard("r0".into())).is_no_card());
        assert!(matches!(
            TransportError::from(PcscError::Pcsc(pcsc::Error::Timeout)),
            TransportError::Timeout
        ));
        assert_eq!(
            TransportError::from(PcscError::ReaderIndexOutOfRange {
                index: 3,
                available: 1
            })
            .to_string(),
            "Reader index 3 out of range (1 readers available)"
        );
    }
}
