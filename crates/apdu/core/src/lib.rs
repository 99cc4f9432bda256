//! Core traits and types for APDU (Application Protocol Data Unit) operations
//!
//! This crate provides the foundational types and traits for exchanging
//! commands with SIM cards according to ISO/IEC 7816-4 and GSM 11.11.
//!
//! ## Overview
//!
//! - Creating and parsing APDU commands and responses
//! - Interpreting status words, including the GSM-specific `9F xx` family
//! - Communicating with cards through pluggable transports ([`CardTransport`])
//! - Executing commands with automatic GET RESPONSE chaining ([`CardExecutor`])
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod command;
pub mod executor;
pub mod response;
pub mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Core error types
mod error;
pub use error::{Error, Result, ResultExt};

// Re-exports for common types
pub use command::{Command, ExpectedLength};
pub use executor::{CardExecutor, Executor};
pub use response::status::StatusWord;
pub use response::{Response, utils};
pub use transport::{CardTransport, TransportError};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        Bytes, BytesMut, Command, Error, Response, Result, ResultExt,
        executor::{CardExecutor, Executor},
        response::status::{StatusWord, common as status},
        transport::{CardTransport, TransportError},
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test the basic types are re-exported correctly
    #[test]
    fn test_reexports() {
        let cmd = Command::new(0xA0, 0xA4, 0x00, 0x00);
        assert_eq!(cmd.cla, 0xA0);
        assert_eq!(cmd.ins, 0xA4);
        assert_eq!(cmd.p1, 0x00);
        assert_eq!(cmd.p2, 0x00);

        let resp = Response::new(Bytes::from_static(&[0x01, 0x02, 0x03]), (0x90, 0x00));
        assert!(resp.is_success());
        assert_eq!(resp.payload().as_ref(), &[0x01, 0x02, 0x03]);
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
    }
}
