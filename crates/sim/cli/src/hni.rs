//! Home network lookup
//!
//! The list is a headerless CSV with rows `prefix, _, name, mcc, mnc`. Rows
//! are scanned in file order and the first one whose prefix equals the first
//! six or the first five IMSI digits wins.

use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, Trim};
use tracing::{debug, warn};

use crate::error::Error;

/// Columns a usable row must have
const MIN_COLUMNS: usize = 5;

/// Digits of the shorter network prefix
const SHORT_PREFIX: usize = 5;

/// Digits of the longer network prefix
const LONG_PREFIX: usize = 6;

/// One row of the home network list
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HniRecord {
    /// IMSI prefix, five or six digits
    pub(crate) prefix: String,
    /// Operator display name
    pub(crate) name: String,
    /// Mobile country code
    pub(crate) mcc: String,
    /// Mobile network code, at least two digits
    pub(crate) mnc: String,
}

impl HniRecord {
    /// Build from a row of at least [`MIN_COLUMNS`] fields
    ///
    /// Operator names are not always UTF-8, invalid bytes are replaced.
    fn from_csv(record: &ByteRecord) -> Self {
        let field = |index: usize| String::from_utf8_lossy(&record[index]).into_owned();

        let mut mnc = field(4);
        if mnc.len() == 1 {
            mnc.insert(0, '0');
        }

        Self {
            prefix: field(0),
            name: field(2),
            mcc: field(3),
            mnc,
        }
    }

    /// EAP-SIM realm of this network
    pub(crate) fn realm(&self) -> String {
        format!("wlan.mnc{}.mcc{}.3gppnetwork.org", self.mnc, self.mcc)
    }
}

/// Find the home network of `imsi` in the list read from `source`
///
/// `path` only names the list in errors.
pub(crate) fn find_home_network<R: Read>(
    source: R,
    path: &Path,
    imsi: &str,
) -> Result<HniRecord, Error> {
    let Some(short) = imsi.get(..SHORT_PREFIX) else {
        return Err(Error::ImsiTooShort {
            imsi: imsi.to_string(),
        });
    };
    let long = imsi.get(..LONG_PREFIX);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    for (line, result) in reader.byte_records().enumerate() {
        let record = result.map_err(|source| Error::HniList {
            path: path.to_path_buf(),
            source,
        })?;

        if record.len() < MIN_COLUMNS {
            warn!(
                path = %path.display(),
                line = line + 1,
                columns = record.len(),
                "Skipping short home network entry"
            );
            continue;
        }

        let prefix = &record[0];
        if prefix == short.as_bytes() || long.is_some_and(|long| prefix == long.as_bytes()) {
            let entry = HniRecord::from_csv(&record);
            debug!(prefix = %entry.prefix, name = %entry.name, "Found home network");
            return Ok(entry);
        }
    }

    Err(Error::NoHomeNetwork {
        prefix: long.unwrap_or(short).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(csv: &str, imsi: &str) -> Result<HniRecord, Error> {
        find_home_network(csv.as_bytes(), Path::new("hnilist.csv"), imsi)
    }

    #[test]
    fn test_first_match_in_file_order() {
        let csv = "001010,x,Six,001,01\n00101,x,Five,001,02\n";
        assert_eq!(find(csv, "001010123456789").unwrap().name, "Six");

        // A five digit row ahead of a six digit one still wins
        let csv = "00101,x,Five,001,02\n001010,x,Six,001,01\n";
        assert_eq!(find(csv, "001010123456789").unwrap().name, "Five");
    }

    #[test]
    fn test_mnc_padding() {
        let entry = find("00101,x,TestNet,001,1\n", "001010123456789").unwrap();
        assert_eq!(entry.mnc, "01");
        assert_eq!(entry.realm(), "wlan.mnc01.mcc001.3gppnetwork.org");

        let entry = find("31041,x,Three,310,410\n", "310410123456789").unwrap();
        assert_eq!(entry.mnc, "410");

        let entry = find("26201,x,Two,262,01\n", "262010123456789").unwrap();
        assert_eq!(entry.mnc, "01");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let entry = find(" 00101 , x , Test Net , 001 , 01 \n", "001010123456789").unwrap();
        assert_eq!(entry.prefix, "00101");
        assert_eq!(entry.name, "Test Net");
        assert_eq!(entry.mcc, "001");
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let csv = "00101,x\n00101,x,TestNet,001,01\n";
        assert_eq!(find(csv, "001010123456789").unwrap().name, "TestNet");
    }

    #[test]
    fn test_no_match() {
        let err = find("26201,x,Two,262,01\n", "001010123456789").unwrap_err();
        assert!(matches!(&err, Error::NoHomeNetwork { prefix } if prefix == "001010"));
        assert_eq!(
            err.to_string(),
            "no matching home network entry for IMSI prefix 001010"
        );
    }

    #[test]
    fn test_imsi_shorter_than_a_prefix() {
        for imsi in ["", "001", "0010"] {
            assert!(matches!(
                find("001,x,Tiny,001,01\n,x,Blank,000,00\n", imsi),
                Err(Error::ImsiTooShort { .. })
            ));
        }
        // Five digits are enough for a five digit row
        assert_eq!(find("00101,x,Five,001,01\n", "00101").unwrap().name, "Five");
    }

    #[test]
    fn test_blank_prefix_never_matches() {
        let csv = ",x,Blank,000,00\n00101,x,TestNet,001,01\n";
        assert_eq!(find(csv, "001010123456789").unwrap().name, "TestNet");
    }

    #[test]
    fn test_non_utf8_rows_are_passed_over() {
        let entry = find_home_network(
            &b"26201,x,Caf\xE9,262,01\n00101,x,TestNet,001,01\n"[..],
            Path::new("hnilist.csv"),
            "001010123456789",
        )
        .unwrap();
        assert_eq!(entry.name, "TestNet");
    }

    #[test]
    fn test_non_utf8_name_of_the_match() {
        let entry = find_home_network(
            &b"26201,x,Caf\xE9 Net,262,01\n"[..],
            Path::new("hnilist.csv"),
            "262010123456789",
        )
        .unwrap();
        assert_eq!(entry.name, "Caf\u{FFFD} Net");
        assert_eq!(entry.realm(), "wlan.mnc01.mcc262.3gppnetwork.org");
    }
}
