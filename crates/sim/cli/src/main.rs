use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simtrip_apdu_core::{CardExecutor, CardTransport};
use simtrip_sim::SimCard;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod error;
mod hni;
mod link;
mod output;

use config::{Config, ImsiPolicy, LinkConfig};
use error::Error;
use link::SimLink;

#[derive(Parser)]
#[command(
    version,
    about = "Run the GSM algorithm on a SIM card and print an EAP-SIM RADIUS user file entry"
)]
struct Cli {
    /// Serial device for SIM access
    #[arg(short, long, value_name = "DEV", default_value = "/dev/ttyUSB0")]
    device: PathBuf,

    /// Baud rate used for SIM access
    #[arg(short, long, value_name = "BAUD", default_value_t = 9600)]
    baud: u32,

    /// PC/SC reader number for SIM access (selects PC/SC instead of serial)
    #[arg(short, long = "pcsc-device", value_name = "PCSC")]
    pcsc_device: Option<usize>,

    /// Home network list
    #[arg(long, value_name = "PATH", default_value = "hnilist.csv")]
    hni_list: PathBuf,

    /// Abort when EF.IMSI cannot be read
    #[arg(long)]
    strict_imsi: bool,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let link = match cli.pcsc_device {
            Some(reader_index) => LinkConfig::Pcsc { reader_index },
            None => LinkConfig::Serial {
                device: cli.device,
                baud_rate: cli.baud,
            },
        };

        Self {
            link,
            hni_list: cli.hni_list,
            imsi_policy: if cli.strict_imsi {
                ImsiPolicy::Strict
            } else {
                ImsiPolicy::BestEffort
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match try_main(cli.into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(config: Config) -> Result<(), Error> {
    debug!(?config, "Starting");

    let mut link = SimLink::open(&config.link)?;
    link.wait_for_card(None).map_err(Error::Apdu)?;

    let mut card = SimCard::new(CardExecutor::new(link));
    app::run(
        &config,
        &mut card,
        &mut rand::rng(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .with_ansi(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_select_serial() {
        let config = Config::from(Cli::parse_from(["gen-eapsim-user"]));
        match config.link {
            LinkConfig::Serial { device, baud_rate } => {
                assert_eq!(device, PathBuf::from("/dev/ttyUSB0"));
                assert_eq!(baud_rate, 9600);
            }
            LinkConfig::Pcsc { .. } => panic!("expected serial link"),
        }
        assert_eq!(config.hni_list, PathBuf::from("hnilist.csv"));
        assert_eq!(config.imsi_policy, ImsiPolicy::BestEffort);
    }

    #[test]
    fn test_reader_index_selects_pcsc() {
        let cli = Cli::parse_from(["gen-eapsim-user", "-p", "1", "--strict-imsi"]);
        let config = Config::from(cli);
        assert!(matches!(config.link, LinkConfig::Pcsc { reader_index: 1 }));
        assert_eq!(config.imsi_policy, ImsiPolicy::Strict);
    }

    #[test]
    fn test_serial_options() {
        let cli = Cli::parse_from(["gen-eapsim-user", "-d", "/dev/ttyS0", "-b", "115200"]);
        assert!(matches!(
            Config::from(cli).link,
            LinkConfig::Serial { baud_rate: 115200, .. }
        ));
    }

    #[test]
    fn test_extraneous_arguments_rejected() {
        assert!(Cli::try_parse_from(["gen-eapsim-user", "extra"]).is_err());
        assert!(Cli::try_parse_from(["gen-eapsim-user", "-b", "fast"]).is_err());
    }
}
