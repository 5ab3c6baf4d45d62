use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paygate::application::checkout::{ChargeOutcome, ChargeRequest, Settlement, charge};
use paygate::application::gateway::Gateway;
use paygate::config::GatewayConfig;
use paygate::domain::payment::{Amount, Pan};
use paygate::domain::response::ResponseSnapshot;
use paygate::infrastructure::soap::SoapTransport;
use paygate::infrastructure::tracing_sink::TracingLogSink;
use paygate::interfaces::csv::charge_reader::ChargeReader;
use paygate::interfaces::csv::snapshot_writer::SnapshotWriter;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gateway configuration file (JSON)
    #[arg(long, short)]
    config: PathBuf,

    /// Send every request to the configured invalid URL instead.
    #[arg(long)]
    invalid_url: bool,

    /// Reject authorised sales whose card security code did not match.
    #[arg(long, global = true)]
    require_cvc_match: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authorise a single sale, then confirm or reject it
    Charge {
        #[arg(long)]
        pan: String,
        #[arg(long)]
        csc: String,
        /// Card expiry date, YYMM
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long, default_value = "")]
        reference: String,
    },
    /// Charge every sale in a CSV file (pan,csc,expiry,amount,reference)
    Batch {
        /// Input sales CSV file
        input: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeReport {
    settlement: Settlement,
    authorisation: ResponseSnapshot,
    follow_up: Option<ResponseSnapshot>,
}

impl From<&ChargeOutcome> for ChargeReport {
    fn from(outcome: &ChargeOutcome) -> Self {
        Self {
            settlement: outcome.settlement,
            authorisation: outcome.authorisation.snapshot(),
            follow_up: outcome.follow_up.as_ref().map(|response| response.snapshot()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = GatewayConfig::from_path(&cli.config).into_diagnostic()?;
    let mut transport = SoapTransport::new(&config).into_diagnostic()?;
    if cli.invalid_url {
        transport = transport.use_invalid_url().into_diagnostic()?;
    }
    tracing::info!(url = transport.url(), "Using gateway endpoint");

    let gateway = Gateway::new(config, Box::new(transport))
        .with_log_sink(Box::new(TracingLogSink::new()));

    match cli.command {
        Command::Charge {
            pan,
            csc,
            expiry,
            amount,
            reference,
        } => {
            let request = ChargeRequest {
                pan: Pan::new(pan),
                csc,
                expiry,
                amount: Amount::new(amount).into_diagnostic()?,
                reference,
            };
            let outcome = charge(&gateway, request, cli.require_cvc_match)
                .await
                .into_diagnostic()?;

            serde_json::to_writer_pretty(io::stdout(), &ChargeReport::from(&outcome))
                .into_diagnostic()?;
            println!();
        }
        Command::Batch { input } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = ChargeReader::new(file);
            let mut writer = SnapshotWriter::new(io::stdout());

            for charge_result in reader.charges() {
                match charge_result {
                    Ok(request) => match charge(&gateway, request, cli.require_cvc_match).await {
                        Ok(outcome) => {
                            writer
                                .write_snapshot(&outcome.final_response().snapshot())
                                .into_diagnostic()?;
                        }
                        Err(e) => {
                            tracing::error!("Error processing charge: {}", e);
                        }
                    },
                    Err(e) => {
                        tracing::error!("Error reading charge: {}", e);
                    }
                }
            }

            writer.flush().into_diagnostic()?;
        }
    }

    Ok(())
}
