use anyhow::Result;
use clap::Parser;
use sol_tx_history::application::app::App;
use sol_tx_history::service;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Solana transaction history service with REST API"
)]
struct HistoryProgram {
    /// RPC endpoint
    #[arg(short, long)]
    rpc_endpoint: String,

    /// Listen port REST API
    #[arg(short, long, default_value_t = 3000)]
    listen_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args = HistoryProgram::parse();

    // Create a shutdown channel
    let (shutdown_sender, _) = broadcast::channel(1);

    let app = Arc::new(App::from_rpc_url(&args.rpc_endpoint));

    // Start the API server
    let server_handle = tokio::spawn(service::api::start_server(
        shutdown_sender.clone(),
        app,
        args.listen_port,
    ));

    // Wait for shutdown signal
    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::warn!("Received Ctrl+C, shutting down...");
        }
    }

    let _ = shutdown_sender.send(());

    let _ = tokio::join!(server_handle);

    tracing::info!("Shutdown complete");
    Ok(())
}
