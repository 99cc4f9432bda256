//! EF.IMSI decoding

/// Decode the content of EF.IMSI into its decimal digits
///
/// The first byte is the number of bytes that follow. The digits are stored
/// nibble-swapped, led by a parity nibble whose bit 3 is set for an odd
/// number of digits, and padded with `f`. Returns `None` when the length
/// byte and the digit count disagree.
pub fn decode_imsi(ef: &[u8]) -> Option<String> {
    let (&length, encoded) = ef.split_first()?;
    if encoded.is_empty() {
        return None;
    }

    let mut digits = encoded
        .iter()
        .flat_map(|b| [b & 0x0F, b >> 4])
        .map(|nibble| char::from_digit(u32::from(nibble), 16))
        .collect::<Option<String>>()?;
    digits.truncate(digits.trim_end_matches('f').len());

    let parity = digits.chars().next()?.to_digit(16)?;
    let odd = (parity >> 3) & 1 == 1;

    // The length byte counts the parity nibble and, for an even IMSI, a pad nibble
    let mut expected = (usize::from(length) * 2).checked_sub(1)?;
    if !odd {
        expected = expected.checked_sub(1)?;
    }

    if expected != digits.len() - 1 {
        return None;
    }

    Some(digits[1..].to_string())
}
