//! Executor for APDU command execution
//!
//! This module provides the executor that sits between command layers and a
//! card transport and takes care of response chaining.

use core::fmt;
use std::time::Duration;

use bytes::Bytes;
use tracing::{Level, debug, info, instrument, trace, warn};

use crate::command::Command;
use crate::response::Response;
use crate::response::status::StatusWord;
use crate::transport::CardTransport;
use crate::{Error, Result, ResultExt};

/// GET RESPONSE instruction byte
const INS_GET_RESPONSE: u8 = 0xC0;

/// Default maximum number of chained GET RESPONSE commands
const DEFAULT_MAX_CHAIN: usize = 10;

/// Trait for APDU command execution
pub trait Executor: fmt::Debug {
    /// Transmit raw APDU bytes and return the complete response bytes
    #[instrument(level = "trace", skip(self), fields(executor = std::any::type_name::<Self>()))]
    fn transmit(&mut self, command: &[u8]) -> Result<Bytes> {
        trace!(command = %hex::encode(command), "Transmitting command");
        let response = self.do_transmit(command);
        match &response {
            Ok(bytes) => {
                trace!(response = %hex::encode(bytes), "Received response");
            }
            Err(err) => {
                debug!(error = ?err, "Error during transmission");
            }
        }
        response
    }

    /// Internal implementation of transmit
    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes>;

    /// Execute a command and parse the response
    fn execute(&mut self, command: &Command) -> Result<Response> {
        let response_bytes = self.transmit(&command.to_bytes())?;
        let response = Response::from_bytes(&response_bytes)?;
        Ok(response)
    }

    /// Block until a card is ready
    fn wait_for_card(&mut self, timeout: Option<Duration>) -> Result<()>;

    /// Reset the executor, including the transport
    fn reset(&mut self) -> Result<()>;
}

/// Card executor that wraps a transport and fetches pending response data
///
/// When the card answers `61 XX` or, as GSM SIMs do, `9F XX`, a GET RESPONSE
/// carrying the class byte of the original command is issued for the
/// announced length and the pieces are stitched together.
#[derive(Debug)]
pub struct CardExecutor<T: CardTransport> {
    /// The transport used for communication
    transport: T,
    /// Maximum number of chained GET RESPONSE commands
    max_chain: usize,
    /// The last response received
    last_response: Option<Bytes>,
}

impl<T: CardTransport> CardExecutor<T> {
    /// Create a new card executor with the given transport
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            max_chain: DEFAULT_MAX_CHAIN,
            last_response: None,
        }
    }

    /// Set the GET RESPONSE chain limit
    pub const fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Take ownership of the transport and return it
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Get the last response received
    pub const fn last_response(&self) -> Option<&Bytes> {
        self.last_response.as_ref()
    }

    fn exchange(&mut self, command: &Command) -> Result<Response> {
        let response_bytes = self
            .transport
            .transmit_raw(&command.to_bytes())
            .map_err(Into::<Error>::into)?;
        Ok(Response::from_bytes(&response_bytes)?)
    }
}

impl<T: CardTransport> Executor for CardExecutor<T> {
    fn do_transmit(&mut self, command: &[u8]) -> Result<Bytes> {
        let command = Command::from_bytes(command)?;

        let mut response = self
            .exchange(&command)
            .context("Failed to transmit command")?;

        let mut chain_count = 0;
        while let Some(le) = response.status().remaining_bytes() {
            if chain_count >= self.max_chain {
                return Err(Error::ChainLimitExceeded);
            }

            let get_response = Command::new_with_le(command.cla, INS_GET_RESPONSE, 0x00, 0x00, le);
            let next = self
                .exchange(&get_response)
                .context("Failed to transmit GET RESPONSE command")?;
            response.append(next);
            chain_count += 1;
        }

        log_status(response.status());

        let response_bytes: Bytes = response.into();
        self.last_response = Some(response_bytes.clone());
        Ok(response_bytes)
    }

    fn wait_for_card(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.transport.wait_for_card(timeout).map_err(Into::into)
    }

    fn reset(&mut self) -> Result<()> {
        self.transport.reset().map_err(Into::<Error>::into)?;
        self.last_response = None;
        Ok(())
    }
}

fn log_status(status: StatusWord) {
    let level = status.tracing_level();
    let description = status.description();
    if level == Level::DEBUG {
        debug!(%status, description, "Command completed");
    } else if level == Level::INFO {
        info!(%status, description, "Command completed");
    } else {
        warn!(%status, description, "Command completed");
    }
}
