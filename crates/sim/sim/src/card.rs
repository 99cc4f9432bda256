//! SIM card command layer

use simtrip_apdu_core::{Executor, Response};
use tracing::{debug, instrument};

use crate::{
    CardReply, Error, Result, commands,
    constants::{DF_GSM_PATH, FileId, RAND_LENGTH},
};

/// The SIM operations the EAP-SIM tooling relies on
///
/// Card-level failures come back as the status word of the [`CardReply`];
/// `Err` is reserved for transport and protocol failures.
pub trait SimCommands {
    /// Select `path` from the master file and read the transparent EF it ends on
    ///
    /// Reads from `offset` to the end of the file when `length` is `None`.
    fn read_binary(
        &mut self,
        path: &[FileId],
        length: Option<u16>,
        offset: u16,
    ) -> Result<CardReply>;

    /// Run the GSM authentication algorithm; the reply carries SRES followed by Kc
    fn run_gsm(&mut self, rand: &[u8; RAND_LENGTH]) -> Result<CardReply>;
}

/// GSM SIM card on top of an executor
#[derive(Debug)]
pub struct SimCard<E: Executor> {
    /// Card executor
    executor: E,
}

impl<E: Executor> SimCard<E> {
    /// Create a new SIM card handle
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Get a reference to the executor
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Get a mutable reference to the executor
    pub const fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Take ownership of the executor and return it
    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Select each file of `path` in turn
    ///
    /// Returns the response of every SELECT; the last one describes the file
    /// the path ends on. Stops at the first SELECT that does not answer `90 00`.
    #[instrument(level = "debug", skip_all, fields(path = %format_path(path)))]
    pub fn select_file(&mut self, path: &[FileId]) -> Result<Vec<Response>> {
        let mut responses = Vec::with_capacity(path.len());
        for &file in path {
            let response = self.executor.execute(&commands::select(file))?;
            if !response.is_success() {
                debug!(
                    file = format_args!("{file:04x}"),
                    status = %response.status(),
                    "SELECT failed"
                );
                return Err(Error::SelectFailed {
                    file,
                    status: response.status(),
                });
            }
            responses.push(response);
        }
        Ok(responses)
    }

    /// Select `path`, mapping a failed SELECT to a reply carrying its status
    fn select_for_reply(
        &mut self,
        path: &[FileId],
    ) -> Result<std::result::Result<Vec<Response>, CardReply>> {
        match self.select_file(path) {
            Ok(responses) => Ok(Ok(responses)),
            Err(Error::SelectFailed { status, .. }) => Ok(Err(CardReply::failed(status))),
            Err(e) => Err(e),
        }
    }
}

impl<E: Executor> SimCommands for SimCard<E> {
    fn read_binary(
        &mut self,
        path: &[FileId],
        length: Option<u16>,
        offset: u16,
    ) -> Result<CardReply> {
        let selected = match self.select_for_reply(path)? {
            Ok(responses) => responses,
            Err(reply) => return Ok(reply),
        };

        let length = match length {
            Some(length) => length,
            None => {
                let size = selected
                    .last()
                    .and_then(|response| file_size(response.payload()))
                    .ok_or(Error::MissingFileSize)?;
                // A zero length would go on the wire as 00, a 256 byte read
                size.checked_sub(offset)
                    .filter(|&rest| rest > 0)
                    .ok_or(Error::OffsetPastEnd { offset, size })?
            }
        };

        debug!(path = %format_path(path), length, offset, "Reading binary");
        let response = self.executor.execute(&commands::read_binary(offset, length))?;
        Ok(response.into())
    }

    fn run_gsm(&mut self, rand: &[u8; RAND_LENGTH]) -> Result<CardReply> {
        if let Err(reply) = self.select_for_reply(&DF_GSM_PATH)? {
            return Ok(reply);
        }

        debug!(rand = %hex::encode(rand), "Running GSM algorithm");
        let response = self.executor.execute(&commands::run_gsm_algorithm(rand))?;
        Ok(response.into())
    }
}

/// File size from bytes 3 and 4 of a GSM SELECT response
fn file_size(select_response: &[u8]) -> Option<u16> {
    match select_response {
        [_, _, hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

fn format_path(path: &[FileId]) -> String {
    path.iter()
        .map(|file| format!("{file:04x}"))
        .collect::<Vec<_>>()
        .join("/")
}
