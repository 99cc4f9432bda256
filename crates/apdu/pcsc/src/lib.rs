//! PC/SC transport implementation for APDU operations
//!
//! This crate provides an implementation of the `CardTransport` trait from
//! `simtrip-apdu-core` using the PC/SC API. Readers are addressed the way
//! SIM tooling usually addresses them: by their index in the PC/SC reader
//! list.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use simtrip_apdu_core::prelude::*;
//! use simtrip_apdu_transport_pcsc::PcscDeviceManager;
//!
//! let manager = PcscDeviceManager::new()?;
//! for (index, reader) in manager.list_readers()?.iter().enumerate() {
//!     println!("{index}: {}", reader.name());
//! }
//!
//! let mut transport = manager.open_reader_by_index(0)?;
//! transport.wait_for_card(None)?;
//!
//! let mut executor = CardExecutor::new(transport);
//! let select_mf = Command::new_with_data(0xA0, 0xA4, 0x00, 0x00, vec![0x3F, 0x00]);
//! let response = executor.execute(&select_mf)?;
//! println!("SELECT MF: {}", response.status());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
mod reader;
mod transport;

pub use config::{PcscConfig, ShareMode};
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;

// Re-export some pcsc types for convenience
pub use pcsc::{Protocol, Protocols};
