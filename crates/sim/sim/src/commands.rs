//! Command builders
//!
//! Every command carries the GSM class byte. Commands answered with `9F xx`
//! are completed by the executor's GET RESPONSE handling.

use simtrip_apdu_core::Command;

use crate::constants::{FileId, MAX_READ_LENGTH, RAND_LENGTH, cla, ins};

/// SELECT a file by identifier
pub fn select(file: FileId) -> Command {
    Command::new_with_data(cla::GSM, ins::SELECT, 0x00, 0x00, file.to_be_bytes().to_vec())
}

/// READ BINARY `length` bytes at `offset` of the current EF
///
/// A length of 256 goes on the wire as `00`.
pub fn read_binary(offset: u16, length: u16) -> Command {
    let [p1, p2] = offset.to_be_bytes();
    let le = (length.min(MAX_READ_LENGTH) & 0xFF) as u8;
    Command::new_with_le(cla::GSM, ins::READ_BINARY, p1, p2, le)
}

/// RUN GSM ALGORITHM with a 16 byte challenge
pub fn run_gsm_algorithm(rand: &[u8; RAND_LENGTH]) -> Command {
    Command::new_with_data(cla::GSM, ins::RUN_GSM_ALGORITHM, 0x00, 0x00, rand.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_select() {
        assert_eq!(select(0x3F00).to_bytes().as_ref(), hex!("A0A40000023F00"));
        assert_eq!(select(0x6F07).to_bytes().as_ref(), hex!("A0A40000026F07"));
    }

    #[test]
    fn test_read_binary() {
        assert_eq!(read_binary(0, 9).to_bytes().as_ref(), hex!("A0B0000009"));
        assert_eq!(read_binary(0x0102, 4).to_bytes().as_ref(), hex!("A0B0010204"));
        // Capped at 256, which encodes as 00
        assert_eq!(read_binary(0, 256).to_bytes().as_ref(), hex!("A0B0000000"));
        assert_eq!(read_binary(0, 1000).to_bytes().as_ref(), hex!("A0B0000000"));
    }

    #[test]
    fn test_run_gsm_algorithm() {
        let rand = hex!("000102030405060708090A0B0C0D0E0F");
        assert_eq!(
            run_gsm_algorithm(&rand).to_bytes().as_ref(),
            hex!("A088000010 000102030405060708090A0B0C0D0E0F")
        );
    }
}
