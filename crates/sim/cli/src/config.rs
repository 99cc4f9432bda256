//! Run configuration

use std::path::PathBuf;

/// How the reader is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LinkConfig {
    /// Serial (Phoenix) reader
    Serial {
        /// Serial device
        device: PathBuf,
        /// Baud rate
        baud_rate: u32,
    },
    /// PC/SC reader, by position in the reader list
    Pcsc {
        /// Reader index
        reader_index: usize,
    },
}

/// What to do when EF.IMSI cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImsiPolicy {
    /// Report the failure and carry on with whatever decodes from the reply
    BestEffort,
    /// Report the failure and stop
    Strict,
}

/// Everything a run needs
#[derive(Debug, Clone)]
pub(crate) struct Config {
    /// Reader to use
    pub(crate) link: LinkConfig,
    /// Home network list
    pub(crate) hni_list: PathBuf,
    /// EF.IMSI read failure handling
    pub(crate) imsi_policy: ImsiPolicy,
}
