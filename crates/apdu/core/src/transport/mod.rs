//! Transport traits for APDU communication with cards
//!
//! A transport moves raw APDU bytes to a card and back. It has no knowledge
//! of command structure or GET RESPONSE chaining; that belongs to the
//! [`Executor`](crate::Executor).

pub mod error;

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Trait for basic card transports
pub trait CardTransport: Send + fmt::Debug {
    /// Error type returned by the transport
    type Error: Into<crate::Error> + fmt::Debug;

    /// Send raw APDU bytes to card and return response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        trace!(command = %hex::encode(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    /// This is the method that concrete implementations should override
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error>;

    /// Check if the transport is connected to a physical card
    fn is_connected(&self) -> bool;

    /// Reset the card and reconnect
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Block until a card is present and ready to accept commands
    ///
    /// `None` waits forever.
    fn wait_for_card(&mut self, timeout: Option<Duration>) -> Result<(), Self::Error>;
}
