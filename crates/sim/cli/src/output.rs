//! RADIUS user file formatting

use std::io::{self, Write};

use crate::hni::HniRecord;

/// Hex characters of SRES at the start of a RUN GSM ALGORITHM reply
const SRES_HEX_LEN: usize = 8;

/// Indentation of attribute lines
const INDENT: &str = "        ";

/// One GSM authentication triplet, hex encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Triplet {
    /// Challenge
    pub(crate) rand: String,
    /// Signed response
    pub(crate) sres: String,
    /// Cipher key
    pub(crate) kc: String,
}

impl Triplet {
    /// Split a RUN GSM ALGORITHM reply into SRES and Kc
    pub(crate) fn from_reply(rand: String, reply_hex: &str) -> Self {
        let (sres, kc) = reply_hex.split_at(reply_hex.len().min(SRES_HEX_LEN));
        Self {
            rand,
            sres: sres.to_string(),
            kc: kc.to_string(),
        }
    }
}

/// `# IMSI: <imsi>`
pub(crate) fn write_imsi(out: &mut impl Write, imsi: &str) -> io::Result<()> {
    writeln!(out, "# IMSI: {imsi}")
}

/// `# <network name>`
pub(crate) fn write_network(out: &mut impl Write, network: &HniRecord) -> io::Result<()> {
    writeln!(out, "# {}", network.name)
}

/// The user line opening the entry
pub(crate) fn write_user(out: &mut impl Write, imsi: &str, network: &HniRecord) -> io::Result<()> {
    writeln!(
        out,
        "1{imsi}@{}  Auth-Type := EAP, EAP-Type := SIM",
        network.realm()
    )
}

/// The three attribute lines of triplet `index` (counting from 1)
pub(crate) fn write_triplet(
    out: &mut impl Write,
    index: usize,
    triplet: &Triplet,
) -> io::Result<()> {
    writeln!(out, "{INDENT}EAP-Sim-Rand{index} = 0x{},", triplet.rand)?;
    writeln!(out, "{INDENT}EAP-Sim-SRES{index} = 0x{},", triplet.sres)?;
    writeln!(out, "{INDENT}EAP-Sim-KC{index} = 0x{},", triplet.kc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_net() -> HniRecord {
        HniRecord {
            prefix: "00101".into(),
            name: "TestNet".into(),
            mcc: "001".into(),
            mnc: "01".into(),
        }
    }

    #[test]
    fn test_split_full_reply() {
        let triplet = Triplet::from_reply("00".repeat(16), "11223344aabbccddeeff0011");
        assert_eq!(triplet.sres, "11223344");
        assert_eq!(triplet.kc, "aabbccddeeff0011");
        assert_eq!(triplet.sres.len() + triplet.kc.len(), 24);
    }

    #[test]
    fn test_split_keeps_every_character() {
        let reply = "11223344aabbccddeeff001";
        let triplet = Triplet::from_reply(String::new(), reply);
        assert_eq!(triplet.sres, "11223344");
        assert_eq!(triplet.kc, "aabbccddeeff001");
        assert_eq!(format!("{}{}", triplet.sres, triplet.kc), reply);
    }

    #[test]
    fn test_split_short_reply() {
        let triplet = Triplet::from_reply(String::new(), "1122");
        assert_eq!(triplet.sres, "1122");
        assert!(triplet.kc.is_empty());
    }

    #[test]
    fn test_entry_layout() {
        let mut out = Vec::new();
        let imsi = "001010123456789";
        write_imsi(&mut out, imsi).unwrap();
        write_network(&mut out, &test_net()).unwrap();
        write_user(&mut out, imsi, &test_net()).unwrap();
        write_triplet(
            &mut out,
            1,
            &Triplet::from_reply("ab".repeat(16), "11223344aabbccddeeff0011"),
        )
        .unwrap();

        let expected = "\
# IMSI: 001010123456789
# TestNet
1001010123456789@wlan.mnc01.mcc001.3gppnetwork.org  Auth-Type := EAP, EAP-Type := SIM
        EAP-Sim-Rand1 = 0xabababababababababababababababab,
        EAP-Sim-SRES1 = 0x11223344,
        EAP-Sim-KC1 = 0xaabbccddeeff0011,
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }
}
