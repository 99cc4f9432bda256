//! Reader selection

use std::time::Duration;

use simtrip_apdu_core::{Bytes, CardTransport, Error as ApduError};
use simtrip_apdu_transport_pcsc::{PcscDeviceManager, PcscTransport};
use simtrip_apdu_transport_serial::{SerialConfig, SerialTransport};
use tracing::info;

use crate::config::LinkConfig;

/// The reader a run talks to, chosen once at startup
#[derive(Debug)]
pub(crate) enum SimLink {
    /// Serial (Phoenix) reader
    Serial(SerialTransport),
    /// PC/SC reader
    Pcsc(PcscTransport),
}

impl SimLink {
    /// Open the reader described by `config`
    pub(crate) fn open(config: &LinkConfig) -> Result<Self, ApduError> {
        match config {
            LinkConfig::Serial { device, baud_rate } => {
                info!(device = %device.display(), baud_rate, "Using serial reader");
                let transport = SerialTransport::open(SerialConfig::new(device, *baud_rate))?;
                Ok(Self::Serial(transport))
            }
            LinkConfig::Pcsc { reader_index } => {
                let manager = PcscDeviceManager::new()?;
                let transport = manager.open_reader_by_index(*reader_index)?;
                info!(reader = transport.reader_name(), "Using PC/SC reader");
                Ok(Self::Pcsc(transport))
            }
        }
    }
}

impl CardTransport for SimLink {
    type Error = ApduError;

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        match self {
            Self::Serial(transport) => Ok(transport.do_transmit_raw(command)?),
            Self::Pcsc(transport) => Ok(transport.do_transmit_raw(command)?),
        }
    }

    fn is_connected(&self) -> bool {
        match self {
            Self::Serial(transport) => transport.is_connected(),
            Self::Pcsc(transport) => transport.is_connected(),
        }
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        match self {
            Self::Serial(transport) => Ok(transport.reset()?),
            Self::Pcsc(transport) => Ok(transport.reset()?),
        }
    }

    fn wait_for_card(&mut self, timeout: Option<Duration>) -> Result<(), Self::Error> {
        match self {
            Self::Serial(transport) => Ok(transport.wait_for_card(timeout)?),
            Self::Pcsc(transport) => Ok(transport.wait_for_card(timeout)?),
        }
    }
}
