//! The run itself: identity, home network, triplets

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use rand::RngCore;
use simtrip_sim::constants::{EF_IMSI_PATH, RAND_LENGTH};
use simtrip_sim::{SimCommands, decode_imsi};
use tracing::{debug, warn};

use crate::config::{Config, ImsiPolicy};
use crate::error::Error;
use crate::hni::find_home_network;
use crate::output::{self, Triplet};

/// Triplets per entry
const TRIPLET_COUNT: usize = 3;

/// Read the card and write one user file entry to `out`
///
/// Card commands that fail with a status word are reported on `diag`. A
/// failed RUN GSM ALGORITHM ends the entry early without failing the run.
pub(crate) fn run<C, R, O, D>(
    config: &Config,
    card: &mut C,
    rng: &mut R,
    out: &mut O,
    diag: &mut D,
) -> Result<(), Error>
where
    C: SimCommands,
    R: RngCore,
    O: Write,
    D: Write,
{
    let hni_list = File::open(&config.hni_list).map_err(|e| Error::HniList {
        path: config.hni_list.clone(),
        source: e.into(),
    })?;

    generate(
        config.imsi_policy,
        card,
        hni_list,
        &config.hni_list,
        rng,
        out,
        diag,
    )
}

fn generate<C, H, R, O, D>(
    imsi_policy: ImsiPolicy,
    card: &mut C,
    hni_list: H,
    hni_path: &Path,
    rng: &mut R,
    out: &mut O,
    diag: &mut D,
) -> Result<(), Error>
where
    C: SimCommands,
    H: Read,
    R: RngCore,
    O: Write,
    D: Write,
{
    let imsi = read_imsi(imsi_policy, card, out, diag)?.ok_or(Error::ImsiUndecodable)?;

    let network = find_home_network(hni_list, hni_path, &imsi)?;
    output::write_network(out, &network)?;
    output::write_user(out, &imsi, &network)?;

    for index in 1..=TRIPLET_COUNT {
        let mut rand = [0u8; RAND_LENGTH];
        rng.fill_bytes(&mut rand);

        let reply = card.run_gsm(&rand)?;
        if !reply.is_success() {
            writeln!(diag, "GSM: Can't run, response code = {}", reply.status)?;
            debug!(completed = index - 1, "Stopping triplet generation");
            break;
        }

        let triplet = Triplet::from_reply(hex::encode(rand), &reply.data_hex());
        output::write_triplet(out, index, &triplet)?;
    }

    out.flush()?;
    Ok(())
}

/// Read and decode EF.IMSI, printing it when it decodes
///
/// `None` when the card gave nothing that decodes as an IMSI.
fn read_imsi<C, O, D>(
    imsi_policy: ImsiPolicy,
    card: &mut C,
    out: &mut O,
    diag: &mut D,
) -> Result<Option<String>, Error>
where
    C: SimCommands,
    O: Write,
    D: Write,
{
    let reply = card.read_binary(&EF_IMSI_PATH, None, 0)?;
    let imsi = decode_imsi(&reply.data);

    if reply.is_success() {
        match &imsi {
            Some(imsi) => output::write_imsi(out, imsi)?,
            None => {
                warn!(ef = %reply.data_hex(), "EF.IMSI does not decode");
                writeln!(diag, "IMSI: Can't decode {}", reply.data_hex())?;
            }
        }
        return Ok(imsi);
    }

    writeln!(diag, "IMSI: Can't read, response code = {}", reply.status)?;
    match imsi_policy {
        ImsiPolicy::Strict => Err(Error::ImsiUnreadable {
            status: reply.status,
        }),
        ImsiPolicy::BestEffort => Ok(imsi),
    }
}
