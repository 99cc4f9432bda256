//! Configuration options for the serial transport

use std::path::PathBuf;
use std::time::Duration;

/// Default serial device
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

/// Default baud rate, matching a 3.5712 MHz card clock at F/D = 372
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Modem control line wired to the card reset contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetLine {
    /// Request To Send
    Rts,
    /// Data Terminal Ready
    Dtr,
}

/// Configuration options for the serial transport
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Serial device path
    pub device: PathBuf,

    /// Baud rate
    pub baud_rate: u32,

    /// Inter-character read timeout; a silent card past this is treated as absent
    pub read_timeout: Duration,

    /// Line driving the card reset contact
    pub reset_line: ResetLine,

    /// Whether raising the reset line puts the card in reset
    pub reset_active_high: bool,

    /// How long reset is held before releasing it
    pub reset_hold: Duration,

    /// Pause between two card detection attempts while waiting for a card
    pub poll_interval: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_secs(1),
            reset_line: ResetLine::Rts,
            reset_active_high: true,
            reset_hold: Duration::from_millis(100),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl SerialConfig {
    /// Create a configuration for `device` at `baud_rate`
    pub fn new(device: impl Into<PathBuf>, baud_rate: u32) -> Self {
        Self {
            device: device.into(),
            baud_rate,
            ..Self::default()
        }
    }

    /// Set the read timeout
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the reset line and its polarity
    pub const fn with_reset_line(mut self, line: ResetLine, active_high: bool) -> Self {
        self.reset_line = line;
        self.reset_active_high = active_high;
        self
    }

    /// Set the card detection poll interval
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SerialConfig::default();
        assert_eq!(config.device, PathBuf::from("/dev/ttyUSB0"));
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.reset_line, ResetLine::Rts);
        assert!(config.reset_active_high);
    }

    #[test]
    fn test_new_keeps_other_defaults() {
        let config = SerialConfig::new("/dev/ttyS1", 115200).with_reset_line(ResetLine::Dtr, false);
        assert_eq!(config.device, PathBuf::from("/dev/ttyS1"));
        assert_eq!(config.baud_rate, 115200);
        assert_eq!(config.reset_line, ResetLine::Dtr);
        assert!(!config.reset_active_high);
        assert_eq!(config.read_timeout, Duration::from_secs(1));
    }
}
