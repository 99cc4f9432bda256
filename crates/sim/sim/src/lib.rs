//! GSM SIM card commands
//!
//! This crate speaks the GSM 11.11 command set (class byte `A0`) on top of
//! any [`Executor`](simtrip_apdu_core::Executor):
//!
//! - selecting files by path from the master file
//! - reading transparent elementary files
//! - running the GSM authentication algorithm
//! - decoding EF.IMSI
//!
//! Status words of READ BINARY and RUN GSM ALGORITHM are returned as data in a
//! [`CardReply`], so callers decide what a failed command means to them.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

pub mod commands;
pub mod constants;

mod card;
mod error;
mod imsi;
mod reply;

pub use card::{SimCard, SimCommands};
pub use constants::FileId;
pub use error::{Error, Result};
pub use imsi::decode_imsi;
pub use reply::CardReply;
