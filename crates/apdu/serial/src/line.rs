//! Byte-level access to the card contact

use std::fmt;
use std::io::{self, Read, Write};

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::config::{ResetLine, SerialConfig};
use crate::error::SerialError;

/// A half-duplex line to the card I/O contact plus its reset contact
///
/// Everything written is also read back, since RX and TX share the wire.
pub trait CardLine: Send {
    /// Write bytes to the line
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read a single byte, `None` when the read timeout expires
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Drive the reset contact
    fn set_reset(&mut self, active: bool) -> io::Result<()>;

    /// Drop anything buffered on the receive side
    fn clear_input(&mut self) -> io::Result<()>;
}

/// [`CardLine`] backed by a real serial port
pub struct PortLine {
    port: Box<dyn SerialPort>,
    reset_line: ResetLine,
    reset_active_high: bool,
}

impl fmt::Debug for PortLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortLine")
            .field("port", &self.port.name())
            .field("reset_line", &self.reset_line)
            .field("reset_active_high", &self.reset_active_high)
            .finish()
    }
}

impl PortLine {
    /// Open and configure the serial port (8 data bits, even parity, 2 stop bits)
    pub fn open(config: &SerialConfig) -> Result<Self, SerialError> {
        let path = config.device.to_string_lossy();
        let port = serialport::new(path.as_ref(), config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::Even)
            .stop_bits(StopBits::Two)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()?;

        Ok(Self {
            port,
            reset_line: config.reset_line,
            reset_active_high: config.reset_active_high,
        })
    }
}

impl CardLine for PortLine {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_reset(&mut self, active: bool) -> io::Result<()> {
        let level = active == self.reset_active_high;
        match self.reset_line {
            ResetLine::Rts => self.port.write_request_to_send(level),
            ResetLine::Dtr => self.port.write_data_terminal_ready(level),
        }
        .map_err(io::Error::from)
    }

    fn clear_input(&mut self) -> io::Result<()> {
        self.port.clear(ClearBuffer::Input).map_err(io::Error::from)
    }
}
