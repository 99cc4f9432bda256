//! Core error type for all APDU operations
//!
//! Every layer of the crate funnels its failures into [`Error`] so callers
//! only have to deal with a single type once a command leaves their hands.

use crate::response::error::ResponseError;
use crate::transport::TransportError;

/// Result alias using the crate [`Error`]
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Core error type that encompasses all possible errors in the crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure reported by the underlying transport
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response bytes could not be interpreted
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// Invalid command length
    #[error("Invalid command length: {0}")]
    InvalidCommandLength(usize),

    /// The card kept announcing more data past the GET RESPONSE chain limit
    #[error("Chain limit exceeded")]
    ChainLimitExceeded,

    /// Context error with message and source error
    #[error("{context}: {source}")]
    Context {
        /// Contextual message
        context: String,
        /// Source error
        source: Box<Self>,
    },
}

impl Error {
    /// Create a new error with context information
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for Result with APDU Errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for core::result::Result<T, E> {
    fn context<S: Into<String>>(self, context: S) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}
