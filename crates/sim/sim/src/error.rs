use simtrip_apdu_core::StatusWord;
use thiserror::Error;

use crate::constants::FileId;

/// Result type for SIM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for SIM operations
#[derive(Debug, Error)]
pub enum Error {
    /// APDU layer errors
    #[error(transparent)]
    Apdu(#[from] simtrip_apdu_core::Error),

    /// A file on the path could not be selected
    #[error("Failed to select {file:04x}, response code = {status}")]
    SelectFailed {
        /// File that was being selected
        file: FileId,
        /// Status word returned by the card
        status: StatusWord,
    },

    /// The SELECT response did not carry a file size
    #[error("SELECT response too short to carry a file size")]
    MissingFileSize,

    /// A whole-file read started at or past the end of the file
    #[error("Read offset {offset} leaves nothing to read in a {size} byte file")]
    OffsetPastEnd {
        /// Requested offset
        offset: u16,
        /// File size from the SELECT response
        size: u16,
    },
}
