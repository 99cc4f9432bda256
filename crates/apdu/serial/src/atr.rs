//! Answer To Reset parsing

use std::fmt;

use tracing::trace;

use crate::error::SerialError;
use crate::line::CardLine;

/// Initial character for the direct convention
const TS_DIRECT: u8 = 0x3B;

/// Answer To Reset as read from the card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atr(Vec<u8>);

impl Atr {
    /// Raw ATR bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Read an ATR off the line right after reset was released
    ///
    /// Fails with [`SerialError::NoCard`] when nothing arrives at all.
    pub(crate) fn read<L: CardLine>(line: &mut L) -> Result<Self, SerialError> {
        let ts = line.read_byte()?.ok_or(SerialError::NoCard)?;
        if ts != TS_DIRECT {
            return Err(SerialError::Protocol(format!(
                "unsupported ATR initial character {ts:02x}"
            )));
        }

        let mut bytes = vec![ts];
        let mut next = |bytes: &mut Vec<u8>| -> Result<u8, SerialError> {
            let b = line
                .read_byte()?
                .ok_or_else(|| SerialError::Protocol("truncated ATR".into()))?;
            bytes.push(b);
            Ok(b)
        };

        let t0 = next(&mut bytes)?;
        let historical = usize::from(t0 & 0x0F);
        let mut indicator = t0 >> 4;
        let mut tck_present = false;

        // TAi, TBi, TCi, TDi for as long as TDi announces more
        loop {
            for bit in 0..3 {
                if indicator & (1 << bit) != 0 {
                    next(&mut bytes)?;
                }
            }
            if indicator & 0x08 == 0 {
                break;
            }
            let td = next(&mut bytes)?;
            if td & 0x0F != 0 {
                tck_present = true;
            }
            indicator = td >> 4;
        }

        for _ in 0..historical {
            next(&mut bytes)?;
        }

        if tck_present {
            next(&mut bytes)?;
        }

        let atr = Self(bytes);
        trace!(atr = %atr, "Parsed ATR");
        Ok(atr)
    }
}

impl fmt::Display for Atr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::io;

    use hex_literal::hex;

    use super::*;

    /// Line that replays card bytes and echoes everything written
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedLine {
        pub(crate) rx: VecDeque<u8>,
        pub(crate) written: Vec<u8>,
        pub(crate) resets: Vec<bool>,
        pub(crate) echo: bool,
    }

    impl ScriptedLine {
        pub(crate) fn new(card: &[u8]) -> Self {
            Self {
                rx: card.iter().copied().collect(),
                echo: true,
                ..Self::default()
            }
        }
    }

    impl CardLine for ScriptedLine {
        fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
            self.written.extend_from_slice(bytes);
            if self.echo {
                for (i, b) in bytes.iter().enumerate() {
                    self.rx.insert(i, *b);
                }
            }
            Ok(())
        }

        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            Ok(self.rx.pop_front())
        }

        fn set_reset(&mut self, active: bool) -> io::Result<()> {
            self.resets.push(active);
            Ok(())
        }

        fn clear_input(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_atr_with_interface_chain() {
        // TA1, TD1 -> TD2 -> TA3 (T=15), 15 historical bytes, then TCK
        let raw = hex!("3B9F95801FC7 8031E073FE211B66D002241401 1000 3D");
        let mut line = ScriptedLine::new(&raw);
        line.rx.push_back(0xFF);

        let atr = Atr::read(&mut line).unwrap();
        assert_eq!(atr.as_bytes(), raw);
        assert_eq!(line.rx, [0xFF]);
    }

    #[test]
    fn test_plain_t0_atr() {
        // T0 = 0x02: no interface bytes, two historical bytes, no TCK under T=0
        let mut line = ScriptedLine::new(&hex!("3B021415"));
        let atr = Atr::read(&mut line).unwrap();
        assert_eq!(atr.as_bytes(), hex!("3B021415"));
        assert_eq!(atr.to_string(), "3b021415");
    }

    #[test]
    fn test_tck_follows_historical_bytes() {
        // TD1 = 0x81 announces TD2 and T=1, TD2 = 0x31 announces TA3 and TB3
        let raw = hex!("3B 81 81 31 FE 45 AA 12");
        let mut line = ScriptedLine::new(&raw);
        let atr = Atr::read(&mut line).unwrap();
        assert_eq!(atr.as_bytes(), raw);
    }

    #[test]
    fn test_silent_line_means_no_card() {
        let mut line = ScriptedLine::new(&[]);
        assert!(matches!(Atr::read(&mut line), Err(SerialError::NoCard)));
    }

    #[test]
    fn test_inverse_convention_rejected() {
        let mut line = ScriptedLine::new(&hex!("03"));
        assert!(matches!(Atr::read(&mut line), Err(SerialError::Protocol(_))));
    }

    #[test]
    fn test_truncated_atr() {
        let mut line = ScriptedLine::new(&hex!("3B0514"));
        assert!(matches!(Atr::read(&mut line), Err(SerialError::Protocol(_))));
    }
}
