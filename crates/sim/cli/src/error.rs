use std::path::PathBuf;

use simtrip_apdu_core::StatusWord;
use thiserror::Error;

/// Fatal errors of a run
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// No row of the home network list matches the IMSI
    #[error("no matching home network entry for IMSI prefix {prefix}")]
    NoHomeNetwork {
        /// Leading IMSI digits that were looked up
        prefix: String,
    },

    /// The IMSI has fewer digits than a network prefix
    #[error("IMSI '{imsi}' is too short to carry a home network prefix")]
    ImsiTooShort {
        /// Decoded IMSI
        imsi: String,
    },

    /// No IMSI could be decoded from the card
    #[error("IMSI could not be decoded, no home network to look up")]
    ImsiUndecodable,

    /// The home network list could not be read
    #[error("failed to read home network list {}: {source}", .path.display())]
    HniList {
        /// Path of the list
        path: PathBuf,
        /// Underlying error
        source: csv::Error,
    },

    /// EF.IMSI could not be read and the run is strict about it
    #[error("IMSI could not be read, response code = {status}")]
    ImsiUnreadable {
        /// Status word of the failed read
        status: StatusWord,
    },

    /// SIM command layer errors
    #[error(transparent)]
    Card(#[from] simtrip_sim::Error),

    /// Reader and transport errors
    #[error(transparent)]
    Apdu(#[from] simtrip_apdu_core::Error),

    /// Output errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
