mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sgflowd")]
#[command(about = "Converge security groups to the rules in firewall change requests", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "SGFLOW_LOG", default_value = "info")]
    log_level: String,

    /// Defaults to `run` with no overrides
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Subscribe to change requests and process them until stopped
    Run {
        /// Config file (default: discovered sgflow.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// NATS server URL
        #[arg(long)]
        nats_url: Option<String>,
        /// Subject change requests arrive on
        #[arg(short, long)]
        subject: Option<String>,
        /// Queue group shared by daemon replicas
        #[arg(short, long)]
        queue_group: Option<String>,
    },
    /// Check a change request file without touching any provider
    Validate {
        /// JSON request file
        file: PathBuf,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let command = cli.command.unwrap_or(Commands::Run {
        config: None,
        nats_url: None,
        subject: None,
        queue_group: None,
    });

    match command {
        Commands::Run {
            config,
            nats_url,
            subject,
            queue_group,
        } => {
            let overrides = commands::run::Overrides {
                nats_url,
                subject,
                queue_group,
            };
            commands::run::handle(config.as_deref(), overrides).await?;
        }
        Commands::Validate { file } => {
            commands::validate::handle(&file)?;
        }
        Commands::Version => {
            println!("sgflowd {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
