mod output;
mod telemetry;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use siren_core::config::Config;
use siren_core::model::envelope::LogEnvelope;
use siren_ingest::server::run_push_server;

use crate::output::{print_alert_human, print_json, print_no_alert_human};
use crate::telemetry::{init_cli_tracing, init_run_tracing};

#[derive(Parser, Debug)]
#[command(name = "siren")]
#[command(about = "Log event to chat webhook alert relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Run the push endpoints")]
    Run {
        #[arg(long)]
        listen_addr: Option<String>,
        #[arg(long)]
        webhook_url: Option<String>,
        #[arg(long)]
        storage_endpoint: Option<String>,
    },
    #[command(about = "Analyze a batch job log file and preview the alert")]
    Check {
        file: PathBuf,
        #[arg(long, help = "Blob-style name, dag_id/task_id/execution_date/...")]
        name: String,
    },
    #[command(about = "Run a stored event envelope through a push handler and preview the alert")]
    Render {
        file: PathBuf,
        #[arg(long, value_enum)]
        kind: HandlerKind,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum HandlerKind {
    Connector,
    Infra,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            listen_addr,
            webhook_url,
            storage_endpoint,
        } => {
            init_run_tracing();
            let mut cfg = Config::load()?;
            if let Some(v) = listen_addr {
                cfg.listen_addr = v;
            }
            if let Some(v) = webhook_url {
                cfg.webhook_url = v;
            }
            if let Some(v) = storage_endpoint {
                cfg.storage_endpoint = v;
            }
            cfg.validate()?;
            run_push_server(&cfg).await?;
            Ok(())
        }
        Commands::Check { file, name } => {
            init_cli_tracing();
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed reading {}", file.display()))?;
            let cfg = Config::load()?;
            let alert = siren_ingest::batch::analyze(&name, &text, &cfg.batch_ui_base)?;
            print_preview(alert.as_ref(), cli.json)
        }
        Commands::Render { file, kind } => {
            init_cli_tracing();
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed reading {}", file.display()))?;
            let envelope: LogEnvelope =
                serde_json::from_str(&raw).context("envelope file is not a log entry")?;
            let cfg = Config::load()?;
            let alert = match kind {
                HandlerKind::Connector => {
                    siren_ingest::connector::handle(&envelope, &cfg.console_base_url)?
                }
                HandlerKind::Infra => siren_ingest::infra::handle(&envelope)?,
            };
            print_preview(alert.as_ref(), cli.json)
        }
    }
}

fn print_preview(alert: Option<&siren_core::model::alert::Alert>, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(alert);
    }
    match alert {
        Some(alert) => print_alert_human(alert),
        None => print_no_alert_human("the event does not warrant a notification"),
    }
    Ok(())
}
