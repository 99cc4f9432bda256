use std::fmt;

use bytes::Bytes;
use simtrip_apdu_core::{Response, StatusWord};

/// Data and final status word of a SIM command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardReply {
    /// Response data, empty when the command failed
    pub data: Bytes,
    /// Final status word
    pub status: StatusWord,
}

impl CardReply {
    /// Create a new reply
    pub fn new(data: impl Into<Bytes>, status: impl Into<StatusWord>) -> Self {
        Self {
            data: data.into(),
            status: status.into(),
        }
    }

    /// Reply for a command that never produced data
    pub fn failed(status: StatusWord) -> Self {
        Self {
            data: Bytes::new(),
            status,
        }
    }

    /// Check if the card answered `90 00`
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Lowercase hex of the data
    pub fn data_hex(&self) -> String {
        hex::encode(&self.data)
    }
}

impl From<Response> for CardReply {
    fn from(response: Response) -> Self {
        let (data, status) = response.into_parts();
        Self { data, status }
    }
}

impl fmt::Display for CardReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.data_hex(), self.status)
    }
}
