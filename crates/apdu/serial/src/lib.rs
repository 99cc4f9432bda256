//! Serial reader transport for APDU operations
//!
//! Drives a "Phoenix" style reader: the card I/O contact is wired to both RX
//! and TX of a UART (so every transmitted byte comes back as an echo) and the
//! card reset contact hangs off RTS or DTR. Commands are exchanged with the
//! character-oriented T=0 protocol of ISO/IEC 7816-3.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use simtrip_apdu_core::CardTransport;
//! use simtrip_apdu_transport_serial::{SerialConfig, SerialTransport};
//!
//! let mut transport = SerialTransport::open(SerialConfig::new("/dev/ttyUSB0", 9600))?;
//! transport.wait_for_card(None)?;
//! println!("ATR: {}", transport.atr().map(|atr| atr.to_string()).unwrap_or_default());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod atr;
mod config;
mod error;
mod line;
mod transport;

pub use atr::Atr;
pub use config::{ResetLine, SerialConfig};
pub use error::SerialError;
pub use line::{CardLine, PortLine};
pub use transport::SerialTransport;
