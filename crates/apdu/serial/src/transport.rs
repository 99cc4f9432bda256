//! T=0 transport over a serial reader

use std::thread;
use std::time::{Duration, Instant};

use simtrip_apdu_core::prelude::*;
use tracing::{debug, info, trace};

use crate::atr::Atr;
use crate::config::SerialConfig;
use crate::error::SerialError;
use crate::line::{CardLine, PortLine};

/// NULL procedure byte, the card asks for more time
const PROCEDURE_NULL: u8 = 0x60;

/// Protocol errors tolerated while a card is still being inserted
const MAX_PROTOCOL_ERRORS: usize = 2;

/// Transport speaking T=0 over a serial reader
#[derive(Debug)]
pub struct SerialTransport<L: CardLine = PortLine> {
    line: L,
    config: SerialConfig,
    atr: Option<Atr>,
}

impl SerialTransport<PortLine> {
    /// Open the serial device named in `config`
    ///
    /// The card is not touched until [`CardTransport::wait_for_card`] or
    /// [`CardTransport::reset`] is called.
    pub fn open(config: SerialConfig) -> Result<Self, SerialError> {
        let line = PortLine::open(&config)?;
        debug!(device = %config.device.display(), baud = config.baud_rate, "Opened serial reader");
        Ok(Self::with_line(line, config))
    }
}

impl<L: CardLine> SerialTransport<L> {
    /// Create a transport on an already open line
    pub const fn with_line(line: L, config: SerialConfig) -> Self {
        Self {
            line,
            config,
            atr: None,
        }
    }

    /// ATR of the card from the last reset
    pub const fn atr(&self) -> Option<&Atr> {
        self.atr.as_ref()
    }

    /// Get the configuration
    pub const fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Write bytes and consume their echo
    fn tx(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.line.write_bytes(bytes)?;
        for &expected in bytes {
            match self.line.read_byte()? {
                Some(b) if b == expected => {}
                got => {
                    return Err(SerialError::BadEcho {
                        expected,
                        got: got.map_or_else(|| "(nil)".to_string(), |b| format!("{b:02x}")),
                    });
                }
            }
        }
        Ok(())
    }

    fn rx(&mut self) -> Result<u8, SerialError> {
        self.line.read_byte()?.ok_or(SerialError::Timeout)
    }

    /// Pulse the reset contact and read the ATR
    fn reset_card(&mut self) -> Result<(), SerialError> {
        self.atr = None;

        self.line.set_reset(true)?;
        thread::sleep(self.config.reset_hold);
        self.line.clear_input()?;
        self.line.set_reset(false)?;

        let atr = Atr::read(&mut self.line)?;
        info!(atr = %atr, "Card answered to reset");
        self.atr = Some(atr);
        Ok(())
    }

    /// Run one command through the T=0 procedure byte exchange
    fn exchange(&mut self, apdu: &[u8]) -> Result<Bytes, SerialError> {
        let command = Command::from_bytes(apdu)
            .map_err(|_| SerialError::InvalidCommand("malformed command APDU"))?;
        let ins = command.ins;
        let header = [command.cla, ins, command.p1, command.p2, command.p3()];

        // A trailing Le is dropped, the card announces outgoing data itself
        let (mut to_send, mut to_receive) = match (command.data(), command.le) {
            (Some(body), _) => (body, 0),
            (None, Some(0)) => (&[][..], 256),
            (None, Some(le)) => (&[][..], usize::from(le)),
            (None, None) => (&[][..], 0),
        };

        self.tx(&header)?;

        let mut data = Vec::with_capacity(to_receive + 2);
        loop {
            let procedure = self.rx()?;
            trace!(procedure = format_args!("{procedure:#04x}"), "Procedure byte");

            if procedure == PROCEDURE_NULL {
                continue;
            }

            if procedure == ins {
                if !to_send.is_empty() {
                    self.tx(to_send)?;
                    to_send = &[];
                } else {
                    for _ in 0..to_receive {
                        data.push(self.rx()?);
                    }
                    to_receive = 0;
                }
                continue;
            }

            if procedure == !ins {
                if let Some((&first, rest)) = to_send.split_first() {
                    self.tx(&[first])?;
                    to_send = rest;
                } else if to_receive > 0 {
                    data.push(self.rx()?);
                    to_receive -= 1;
                }
                continue;
            }

            if matches!(procedure & 0xF0, 0x60 | 0x90) {
                let sw2 = self.rx()?;
                data.push(procedure);
                data.push(sw2);
                return Ok(Bytes::from(data));
            }

            return Err(SerialError::Protocol(format!(
                "unexpected procedure byte {procedure:02x}"
            )));
        }
    }
}

impl<L: CardLine + std::fmt::Debug> CardTransport for SerialTransport<L> {
    type Error = SerialError;

    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, Self::Error> {
        if self.atr.is_none() {
            return Err(SerialError::NoCard);
        }
        self.exchange(command)
    }

    fn is_connected(&self) -> bool {
        self.atr.is_some()
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.reset_card()
    }

    fn wait_for_card(&mut self, timeout: Option<Duration>) -> Result<(), Self::Error> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut protocol_errors = 0;
        let mut announced = false;

        loop {
            match self.reset_card() {
                Ok(()) => return Ok(()),
                Err(SerialError::NoCard) => {}
                Err(e @ SerialError::Protocol(_)) => {
                    protocol_errors += 1;
                    if protocol_errors > MAX_PROTOCOL_ERRORS {
                        return Err(e);
                    }
                    debug!(error = %e, "Card not ready yet");
                }
                Err(e) => return Err(e),
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(SerialError::NoCard);
            }

            if !announced {
                info!(device = %self.config.device.display(), "Waiting for card");
                announced = true;
            }
            thread::sleep(self.config.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::atr::tests::ScriptedLine;

    fn test_config() -> SerialConfig {
        SerialConfig {
            reset_hold: Duration::ZERO,
            poll_interval: Duration::ZERO,
            ..SerialConfig::default()
        }
    }

    /// Transport with a card that already answered `3B 00` to reset
    fn ready(card: &[u8]) -> SerialTransport<ScriptedLine> {
        let mut script = hex!("3B00").to_vec();
        script.extend_from_slice(card);
        let mut transport = SerialTransport::with_line(ScriptedLine::new(&script), test_config());
        transport.wait_for_card(None).unwrap();
        transport
    }

    #[test]
    fn test_wait_for_card_reads_atr() {
        let transport = ready(&[]);
        assert_eq!(transport.atr().unwrap().as_bytes(), hex!("3B00"));
        assert!(transport.is_connected());
        assert_eq!(transport.line.resets, vec![true, false]);
    }

    #[test]
    fn test_wait_for_card_gives_up_at_deadline() {
        let mut transport = SerialTransport::with_line(ScriptedLine::new(&[]), test_config());
        let result = transport.wait_for_card(Some(Duration::ZERO));
        assert!(matches!(result, Err(SerialError::NoCard)));
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_transmit_requires_reset() {
        let mut transport = SerialTransport::with_line(ScriptedLine::new(&[]), test_config());
        assert!(matches!(
            transport.transmit_raw(&hex!("A0A40000023F00")),
            Err(SerialError::NoCard)
        ));
    }

    #[test]
    fn test_select_sends_body_after_ins_ack() {
        let mut transport = ready(&hex!("A4 9F16"));
        let response = transport.transmit_raw(&hex!("A0A40000023F00")).unwrap();
        assert_eq!(response.as_ref(), hex!("9F16"));
        assert_eq!(transport.line.written, hex!("A0A40000023F00"));
    }

    #[test]
    fn test_get_response_skips_null_bytes() {
        let mut transport = ready(&hex!("60 60 C0 11223344AABBCCDDEEFF0011 9000"));
        let response = transport.transmit_raw(&hex!("A0C000000C")).unwrap();
        assert_eq!(response.as_ref(), hex!("11223344AABBCCDDEEFF00119000"));
    }

    #[test]
    fn test_single_byte_transfer() {
        let mut transport = ready(&hex!("5B 5B 9000"));
        let response = transport.transmit_raw(&hex!("A0A40000027F20")).unwrap();
        assert_eq!(response.as_ref(), hex!("9000"));
        assert_eq!(transport.line.written, hex!("A0A40000027F20"));
    }

    #[test]
    fn test_status_before_body_ends_exchange() {
        let mut transport = ready(&hex!("9404"));
        let response = transport.transmit_raw(&hex!("A0A40000026F07")).unwrap();
        assert_eq!(response.as_ref(), hex!("9404"));
        assert_eq!(transport.line.written, hex!("A0A4000002"));
    }

    #[test]
    fn test_bad_echo() {
        let mut transport = ready(&hex!("9000"));
        transport.line.echo = false;
        assert!(matches!(
            transport.transmit_raw(&hex!("A0F2000016")),
            Err(SerialError::BadEcho { expected: 0xA0, .. })
        ));
    }

    #[test]
    fn test_unexpected_procedure_byte() {
        let mut transport = ready(&hex!("00"));
        assert!(matches!(
            transport.transmit_raw(&hex!("A0F2000016")),
            Err(SerialError::Protocol(_))
        ));
    }

    #[test]
    fn test_malformed_command_is_not_sent() {
        let mut transport = ready(&[]);
        assert!(matches!(
            transport.transmit_raw(&hex!("A0A4000002 3F")),
            Err(SerialError::InvalidCommand(_))
        ));
        assert!(matches!(
            transport.transmit_raw(&hex!("A0A4")),
            Err(SerialError::InvalidCommand(_))
        ));
        assert!(transport.line.written.is_empty());
    }

    #[test]
    fn test_header_only_command_sends_zero_p3() {
        let mut transport = ready(&hex!("9000"));
        let response = transport.transmit_raw(&hex!("A0F20000")).unwrap();
        assert_eq!(response.as_ref(), hex!("9000"));
        assert_eq!(transport.line.written, hex!("A0F2000000"));
    }

    #[test]
    fn test_silent_card_times_out() {
        let mut transport = ready(&[]);
        assert!(matches!(
            transport.transmit_raw(&hex!("A0F2000016")),
            Err(SerialError::Timeout)
        ));
    }
}
