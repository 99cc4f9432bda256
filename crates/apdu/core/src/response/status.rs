//! Status word definitions for APDU responses
//!
//! Covers the ISO/IEC 7816-4 interindustry codes as well as the GSM 11.11
//! codes (`9F xx`, `92 xx`, `94 xx`, `98 xx`) a SIM answers with.

use std::fmt;

use tracing::Level;

/// Status Word (SW1-SW2) from an APDU response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Create from a u16 value (SW1 | SW2)
    pub const fn from_u16(status: u16) -> Self {
        Self {
            sw1: (status >> 8) as u8,
            sw2: status as u8,
        }
    }

    /// Convert to a u16 value (SW1 | SW2)
    pub const fn to_u16(&self) -> u16 {
        ((self.sw1 as u16) << 8) | (self.sw2 as u16)
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Check if this status word indicates more data is available (61 XX)
    pub const fn is_more_data_available(&self) -> bool {
        self.sw1 == 0x61
    }

    /// Check if a GSM SIM has response data of length SW2 waiting (9F XX)
    pub const fn is_gsm_response_available(&self) -> bool {
        self.sw1 == 0x9F
    }

    /// Check if response data must be fetched with GET RESPONSE
    pub const fn needs_get_response(&self) -> bool {
        self.is_more_data_available() || self.is_gsm_response_available()
    }

    /// Get the number of bytes waiting when SW1 = 61 or 9F
    pub const fn remaining_bytes(&self) -> Option<u8> {
        if self.needs_get_response() {
            Some(self.sw2)
        } else {
            None
        }
    }

    /// Check if this status word indicates a warning (62 XX / 63 XX)
    pub const fn is_warning(&self) -> bool {
        self.sw1 == 0x62 || self.sw1 == 0x63
    }

    /// Check if this status word indicates a file not found (6A 82 / 94 04)
    pub const fn is_file_not_found(&self) -> bool {
        matches!((self.sw1, self.sw2), (0x6A, 0x82) | (0x94, 0x04))
    }

    /// Check if this status word indicates an unfulfilled access condition (69 82 / 98 04)
    pub const fn is_security_condition_not_satisfied(&self) -> bool {
        matches!((self.sw1, self.sw2), (0x69, 0x82) | (0x98, 0x04))
    }

    /// Get the appropriate tracing level for this status word
    pub const fn tracing_level(&self) -> Level {
        if self.is_success() || self.needs_get_response() {
            Level::DEBUG
        } else if self.is_warning() || self.sw1 == 0x91 || self.sw1 == 0x92 {
            Level::INFO
        } else {
            Level::WARN
        }
    }

    /// Get a description of this status word
    pub const fn description(&self) -> &'static str {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) => "Success",
            (0x61, _) => "More data available",
            (0x9F, _) => "Response data available",
            (0x91, _) => "Success, proactive command pending",
            (0x92, 0x40) => "Memory problem",
            (0x92, n) if n < 0x10 => "Success after internal retries",
            (0x93, 0x00) => "SIM application toolkit busy",
            (0x94, 0x00) => "No EF selected",
            (0x94, 0x02) => "Out of range (invalid address)",
            (0x94, 0x04) => "File ID not found",
            (0x94, 0x08) => "File is inconsistent with the command",
            (0x98, 0x02) => "No CHV initialized",
            (0x98, 0x04) => "Access condition not fulfilled",
            (0x98, 0x08) => "In contradiction with CHV status",
            (0x98, 0x10) => "In contradiction with invalidation status",
            (0x98, 0x40) => "CHV blocked",
            (0x98, 0x50) => "Increase cannot be performed, maximum value reached",
            (0x62, 0x00) => "No information given",
            (0x62, 0x81) => "Part of returned data may be corrupted",
            (0x62, 0x82) => "End of file/record reached before reading Le bytes",
            (0x62, 0x83) => "Selected file invalidated",
            (0x63, n) if (n & 0xF0) == 0xC0 => "Counter value",
            (0x65, 0x81) => "Memory failure",
            (0x67, _) => "Wrong length",
            (0x69, 0x82) => "Security status not satisfied",
            (0x69, 0x83) => "Authentication method blocked",
            (0x69, 0x85) => "Conditions of use not satisfied",
            (0x69, 0x86) => "Command not allowed",
            (0x6A, 0x81) => "Function not supported",
            (0x6A, 0x82) => "File not found",
            (0x6A, 0x86) => "Incorrect parameters P1-P2",
            (0x6B, _) => "Wrong parameters P1-P2",
            (0x6C, _) => "Wrong Le field",
            (0x6D, _) => "Instruction code not supported or invalid",
            (0x6E, _) => "Class not supported",
            (0x6F, _) => "No precise diagnosis",
            _ => "Unknown status word",
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from(tuple: (u8, u8)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<u16> for StatusWord {
    fn from(status: u16) -> Self {
        Self::from_u16(status)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

/// Renders as four lowercase hex digits, e.g. `9000`
impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}", self.sw1, self.sw2)
    }
}

/// Common status words
pub mod common {
    use super::StatusWord;

    /// Success (90 00)
    pub const SUCCESS: StatusWord = StatusWord::new(0x90, 0x00);

    /// More data available (61 XX) - XX is the number of remaining bytes
    pub const MORE_DATA: StatusWord = StatusWord::new(0x61, 0x00);

    /// GSM response data available (9F XX) - XX is the response length
    pub const GSM_RESPONSE_AVAILABLE: StatusWord = StatusWord::new(0x9F, 0x00);

    /// No EF selected (94 00)
    pub const NO_EF_SELECTED: StatusWord = StatusWord::new(0x94, 0x00);

    /// File ID not found (94 04)
    pub const GSM_FILE_NOT_FOUND: StatusWord = StatusWord::new(0x94, 0x04);

    /// Access condition not fulfilled (98 04)
    pub const ACCESS_CONDITION_NOT_FULFILLED: StatusWord = StatusWord::new(0x98, 0x04);

    /// Wrong length (67 00)
    pub const WRONG_LENGTH: StatusWord = StatusWord::new(0x67, 0x00);

    /// File not found (6A 82)
    pub const FILE_NOT_FOUND: StatusWord = StatusWord::new(0x6A, 0x82);

    /// Invalid instruction (6D 00)
    pub const INVALID_INSTRUCTION: StatusWord = StatusWord::new(0x6D, 0x00);

    /// Class not supported (6E 00)
    pub const CLASS_NOT_SUPPORTED: StatusWord = StatusWord::new(0x6E, 0x00);
}
