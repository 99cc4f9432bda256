//! Scripted in-memory transport
//!
//! Returns canned responses in order and records every command it was sent,
//! so command layers can be tested without a reader attached.

use std::collections::VecDeque;
use std::time::Duration;

use bytes::Bytes;

use crate::transport::{CardTransport, TransportError};

/// Mock transport for testing
#[derive(Debug, Clone)]
pub struct MockTransport {
    /// Responses still to be returned, front first
    pub responses: VecDeque<Bytes>,
    /// Commands that were sent
    pub commands: Vec<Bytes>,
    /// Whether a card is inserted
    pub card_present: bool,
    /// Number of resets performed
    pub resets: usize,
}

impl MockTransport {
    /// Create a new mock transport with the given responses
    pub fn new<I, B>(responses: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            commands: Vec::new(),
            card_present: true,
            resets: 0,
        }
    }

    /// Create a new mock transport that answers a single command with success (90 00)
    pub fn with_success() -> Self {
        Self::new([Bytes::from_static(&[0x90, 0x00])])
    }

    /// Create a new mock transport with an empty reader
    pub fn without_card() -> Self {
        Self {
            card_present: false,
            ..Self::new(Vec::<Bytes>::new())
        }
    }

    /// Queue another response
    pub fn push_response(&mut self, response: impl Into<Bytes>) {
        self.responses.push_back(response.into());
    }

    /// Commands sent so far, hex encoded for easy assertions
    pub fn sent_hex(&self) -> Vec<String> {
        self.commands.iter().map(hex::encode).collect()
    }
}

impl CardTransport for MockTransport {
    type Error = TransportError;

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        if !self.card_present {
            return Err(TransportError::NoCard);
        }

        self.commands.push(Bytes::copy_from_slice(command));
        self.responses.pop_front().ok_or(TransportError::Transmission)
    }

    fn is_connected(&self) -> bool {
        self.card_present
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.resets += 1;
        Ok(())
    }

    fn wait_for_card(&mut self, _timeout: Option<Duration>) -> Result<(), Self::Error> {
        if self.card_present {
            Ok(())
        } else {
            Err(TransportError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responses_are_consumed_in_order() {
        let mut transport = MockTransport::new([vec![0x9Fu8, 0x0C], vec![0x90u8, 0x00]]);
        assert_eq!(transport.transmit_raw(&[0xA0]).unwrap().as_ref(), &[0x9F, 0x0C]);
        assert_eq!(transport.transmit_raw(&[0xA1]).unwrap().as_ref(), &[0x90, 0x00]);
        assert!(matches!(
            transport.transmit_raw(&[0xA2]),
            Err(TransportError::Transmission)
        ));
        assert_eq!(transport.sent_hex(), vec!["a0", "a1", "a2"]);
    }

    #[test]
    fn test_empty_reader() {
        let mut transport = MockTransport::without_card();
        assert!(transport.wait_for_card(None).is_err());
        assert!(matches!(transport.transmit_raw(&[0xA0]), Err(TransportError::NoCard)));
    }
}
