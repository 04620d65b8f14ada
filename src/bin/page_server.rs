use bitable_qr::server::{self, PageAssets};
use bitable_qr::utils::logger;
use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "page-server")]
#[command(about = "Serve the static landing page and favicon")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    /// Directory with index.html and favicon.ico (embedded pages when absent)
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    let assets = match &args.assets_dir {
        Some(dir) => {
            tracing::info!("📁 Loading pages from: {}", dir.display());
            PageAssets::from_dir(dir)?
        }
        None => PageAssets::embedded(),
    };

    let listener = TcpListener::bind((args.host.as_str(), args.port)).await?;
    server::serve(listener, assets, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown requested");
}
