//! PC/SC transport implementation

use std::ffi::CString;
use std::fmt;
use std::time::{Duration, Instant};

use pcsc::{Card, Context, Disposition, MAX_BUFFER_SIZE, ReaderState, State};
use simtrip_apdu_core::prelude::*;
use tracing::{debug, info};

use crate::{config::PcscConfig, error::PcscError, reader::card_present};

/// Transport implementation using PC/SC
pub struct PcscTransport {
    /// PC/SC context
    context: Context,
    /// Card connection, if established
    card: Option<Card>,
    /// Reader name
    reader_name: String,
    /// Configuration
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Create a new PC/SC transport for the specified reader
    pub(crate) fn new(
        context: Context,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<Self, PcscError> {
        let mut transport = Self {
            context,
            card: None,
            reader_name: reader_name.to_string(),
            config,
        };

        // The reader may still be empty, wait_for_card connects later
        let _ = transport.connect_card();

        Ok(transport)
    }

    fn reader_cstr(&self) -> Result<CString, PcscError> {
        CString::new(self.reader_name.clone())
            .map_err(|_| PcscError::ReaderNotFound(self.reader_name.clone()))
    }

    /// Try to connect to the card
    fn connect_card(&mut self) -> Result<(), PcscError> {
        if self.card.is_some() {
            return Ok(());
        }

        let reader_cstr = self.reader_cstr()?;

        match self.context.connect(
            &reader_cstr,
            self.config.share_mode.into(),
            self.config.protocols,
        ) {
            Ok(card) => {
                debug!(reader = %self.reader_name, "Connected to card");
                self.card = Some(card);
                Ok(())
            }
            Err(pcsc::Error::NoSmartcard) => Err(PcscError::NoCard(self.reader_name.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the ATR of the current card
    pub fn atr(&self) -> Result<Vec<u8>, PcscError> {
        self.card.as_ref().map_or_else(
            || Err(PcscError::NoCard(self.reader_name.clone())),
            |card| {
                card.get_attribute_owned(pcsc::Attribute::AtrString)
                    .map_err(Into::into)
            },
        )
    }

    /// Get the reader name
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// Transmit a command to the card
    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        self.connect_card()?;

        let card = match &mut self.card {
            Some(card) => card,
            None => return Err(PcscError::NoCard(self.reader_name.clone())),
        };

        let mut response_buffer = [0u8; MAX_BUFFER_SIZE];

        match card.transmit(command, &mut response_buffer) {
            Ok(response) => Ok(Bytes::copy_from_slice(response)),
            Err(e) => {
                // If card was reset or removed, clear our reference
                if matches!(e, pcsc::Error::ResetCard | pcsc::Error::RemovedCard) {
                    self.card = None;

                    if self.config.auto_reconnect
                        && e == pcsc::Error::ResetCard
                        && self.connect_card().is_ok()
                    {
                        return self.transmit_command(command);
                    }

                    if e == pcsc::Error::RemovedCard {
                        return Err(PcscError::CardRemoved);
                    }
                }

                Err(e.into())
            }
        }
    }

    /// Block on reader state changes until a card shows up
    fn wait_for_presence(&self, timeout: Option<Duration>) -> Result<(), PcscError> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut reader_states = vec![ReaderState::new(self.reader_cstr()?, State::UNAWARE)];

        loop {
            let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));
            match self.context.get_status_change(remaining, &mut reader_states) {
                Ok(()) => {}
                Err(pcsc::Error::Timeout) => {
                    return Err(PcscError::Timeout(self.reader_name.clone()));
                }
                Err(pcsc::Error::UnknownReader) => {
                    return Err(PcscError::ReaderNotFound(self.reader_name.clone()));
                }
                Err(e) => return Err(e.into()),
            }

            if card_present(reader_states[0].event_state()) {
                return Ok(());
            }

            reader_states[0].sync_current_state();
        }
    }
}

impl CardTransport for PcscTransport {
    type Error = PcscError;

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        self.transmit_command(command)
    }

    fn is_connected(&self) -> bool {
        self.card.is_some()
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::ResetCard);
        }

        self.connect_card()
    }

    fn wait_for_card(&mut self, timeout: Option<Duration>) -> Result<(), Self::Error> {
        if self.card.is_none() {
            info!(reader = %self.reader_name, "Waiting for card");
            self.wait_for_presence(timeout)?;
        }
        self.connect_card()
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::LeaveCard);
        }
    }
}
