use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use prodline::config::{LogFormat, ServeConfig};
use prodline::{inspect, server};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Production line performance dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the upload form and render dashboards for uploaded files
    Serve(ServeArgs),
    /// Run the pipeline on a local file and print per-line trend summaries
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address to listen on (overrides PRODLINE_BIND)
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Upload size limit in megabytes (overrides PRODLINE_MAX_UPLOAD_MB)
    #[arg(long)]
    max_upload_mb: Option<u64>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Workbook or CSV file to analyse
    path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(LogFormat::from_env()?);

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let config = ServeConfig::from_env()?.with_overrides(args.bind, args.max_upload_mb)?;
            server::serve(config).await
        }
        Command::Inspect(args) => inspect::run(&args.path),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
