//! Constants from GSM 11.11
//!
//! Class byte, instruction codes and the file identifiers this crate needs.

/// File identifier
pub type FileId = u16;

/// Command class
pub mod cla {
    /// GSM command class
    pub const GSM: u8 = 0xA0;
}

/// Instruction codes
pub mod ins {
    /// SELECT command
    pub const SELECT: u8 = 0xA4;
    /// READ BINARY command
    pub const READ_BINARY: u8 = 0xB0;
    /// RUN GSM ALGORITHM command
    pub const RUN_GSM_ALGORITHM: u8 = 0x88;
}

/// File identifiers
pub mod fid {
    use super::FileId;

    /// Master file
    pub const MF: FileId = 0x3F00;
    /// GSM dedicated file
    pub const DF_GSM: FileId = 0x7F20;
    /// IMSI elementary file
    pub const EF_IMSI: FileId = 0x6F07;
}

/// Path of EF.IMSI from the master file
pub const EF_IMSI_PATH: [FileId; 3] = [fid::MF, fid::DF_GSM, fid::EF_IMSI];

/// Path of DF.GSM from the master file
pub const DF_GSM_PATH: [FileId; 2] = [fid::MF, fid::DF_GSM];

/// Length of the RUN GSM ALGORITHM challenge
pub const RAND_LENGTH: usize = 16;

/// Largest transfer a single READ BINARY can ask for
pub const MAX_READ_LENGTH: u16 = 256;
