//! APDU command definitions
//!
//! Only short APDUs are supported, which is all a GSM SIM ever speaks. Under
//! T=0 the single trailing length byte doubles as P3, so a command carries
//! either a body or an expected length, never both on the wire.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{Error, Result};

/// Expected length type for APDU commands (`0` means 256)
pub type ExpectedLength = u8;

/// Generic APDU command structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Parameter 1
    pub p1: u8,
    /// Parameter 2
    pub p2: u8,
    /// Command data (optional)
    pub data: Option<Bytes>,
    /// Expected length (optional)
    pub le: Option<ExpectedLength>,
}

impl Command {
    /// Create a new command with just the header bytes
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: None,
        }
    }

    /// Create a new command with expected response length (Le)
    pub const fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: ExpectedLength) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: None,
            le: Some(le),
        }
    }

    /// Create a new command with data payload
    pub fn new_with_data<T: Into<Bytes>>(cla: u8, ins: u8, p1: u8, p2: u8, data: T) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Some(data.into()),
            le: None,
        }
    }

    /// Set the data field
    pub fn with_data<T: Into<Bytes>>(mut self, data: T) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the expected length field
    pub const fn with_le(mut self, le: ExpectedLength) -> Self {
        self.le = Some(le);
        self
    }

    /// Command payload data, if any
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Calculate length of serialized command
    pub fn command_length(&self) -> usize {
        // Header (CLA, INS, P1, P2) is always 4 bytes
        let mut length = 4;
        if let Some(data) = self.data() {
            length += 1 + data.len();
        }
        if self.le.is_some() {
            length += 1;
        }
        length
    }

    /// Convert to raw APDU bytes
    pub fn to_bytes(&self) -> Bytes {
        let mut buffer = BytesMut::with_capacity(self.command_length());

        // Header: CLA, INS, P1, P2
        buffer.put_u8(self.cla);
        buffer.put_u8(self.ins);
        buffer.put_u8(self.p1);
        buffer.put_u8(self.p2);

        // Add Lc and data if present
        if let Some(data) = self.data() {
            buffer.put_u8(data.len() as u8);
            buffer.put_slice(data);
        }

        if let Some(le) = self.le {
            buffer.put_u8(le);
        }

        buffer.freeze()
    }

    /// Parse a command from raw bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::InvalidCommandLength(data.len()));
        }

        let mut command = Self::new(data[0], data[1], data[2], data[3]);

        if data.len() > 4 {
            let lc = data[4] as usize;

            if data.len() == 5 {
                // Only Le present, no data
                command.le = Some(data[4]);
            } else if data.len() >= 5 + lc {
                if lc > 0 {
                    command.data = Some(Bytes::copy_from_slice(&data[5..5 + lc]));
                }

                if data.len() > 5 + lc {
                    if data.len() == 5 + lc + 1 {
                        command.le = Some(data[5 + lc]);
                    } else {
                        return Err(Error::InvalidCommandLength(data.len()));
                    }
                }
            } else {
                return Err(Error::InvalidCommandLength(data.len()));
            }
        }

        Ok(command)
    }

    /// The P3 byte a T=0 reader puts on the wire for this command
    pub fn p3(&self) -> u8 {
        match (self.data(), self.le) {
            (Some(data), _) => data.len() as u8,
            (None, Some(le)) => le,
            (None, None) => 0,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_command_serialization() {
        let cmd = Command::new_with_data(0xA0, 0xA4, 0x00, 0x00, hex!("3F00").to_vec());
        assert_eq!(cmd.to_bytes().as_ref(), hex!("A0A40000023F00"));

        let cmd = Command::new_with_le(0xA0, 0xB0, 0x00, 0x00, 0x09);
        assert_eq!(cmd.to_bytes().as_ref(), hex!("A0B0000009"));
    }

    #[test]
    fn test_command_length() {
        let cmd1 = Command::new(0x00, 0xB0, 0x00, 0x00);
        assert_eq!(cmd1.command_length(), 4);

        let cmd2 = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, 0xFF);
        assert_eq!(cmd2.command_length(), 5);

        let cmd3 = Command::new_with_data(0x00, 0xD6, 0x00, 0x00, vec![0x01u8, 0x02, 0x03]);
        assert_eq!(cmd3.command_length(), 8);

        let cmd4 = cmd3.with_le(0xFF);
        assert_eq!(cmd4.command_length(), 9);
    }

    #[test]
    fn test_command_from_bytes() {
        // Header only
        let cmd = Command::from_bytes(&hex!("A0A40000")).unwrap();
        assert_eq!((cmd.cla, cmd.ins, cmd.p1, cmd.p2), (0xA0, 0xA4, 0x00, 0x00));
        assert!(cmd.data.is_none());
        assert!(cmd.le.is_none());

        // Data, no Le
        let cmd = Command::from_bytes(&hex!("A0A40000027F20")).unwrap();
        assert_eq!(cmd.data(), Some(hex!("7F20").as_ref()));
        assert!(cmd.le.is_none());

        // Le only
        let cmd = Command::from_bytes(&hex!("A0C000000C")).unwrap();
        assert!(cmd.data.is_none());
        assert_eq!(cmd.le, Some(0x0C));

        // Data and Le
        let cmd = Command::from_bytes(&hex!("00A4040003010203FF")).unwrap();
        assert_eq!(cmd.data(), Some(hex!("010203").as_ref()));
        assert_eq!(cmd.le, Some(0xFF));

        // Truncated body
        assert!(Command::from_bytes(&hex!("A0A4000002 3F")).is_err());
        assert!(Command::from_bytes(&hex!("A0A4")).is_err());
    }

    #[test]
    fn test_p3() {
        let rand = [0u8; 16];
        assert_eq!(Command::new_with_data(0xA0, 0x88, 0, 0, rand.to_vec()).p3(), 0x10);
        assert_eq!(Command::new_with_le(0xA0, 0xC0, 0, 0, 0x0C).p3(), 0x0C);
        assert_eq!(Command::new(0xA0, 0xF2, 0, 0).p3(), 0x00);
    }
}
