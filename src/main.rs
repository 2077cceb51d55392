//! Process entry point and lifecycle controller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use warden_gateway::config::{load_config, validate_config, GatewayConfig};
use warden_gateway::http::GatewayServer;
use warden_gateway::lifecycle::{race_drain, signals, DrainOutcome, Shutdown};
use warden_gateway::observability;
use warden_gateway::vault::VaultSessionProvider;

#[derive(Parser, Debug)]
#[command(name = "warden-gateway")]
#[command(about = "Credential-scoped gateway for the vault secrets API", long_about = None)]
struct Args {
    /// Bind address for the listener.
    #[arg(long, default_value = "0.0.0.0:9998")]
    hostname: String,

    /// Serve plain HTTP instead of TLS.
    #[arg(long)]
    insecure: bool,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    /// Path to the TLS private key (PEM).
    #[arg(long, default_value = "/certs/key.pem")]
    key_file: String,

    /// Path to the TLS certificate (PEM).
    #[arg(long, default_value = "/certs/cert.pem")]
    cert_file: String,

    /// Optional TOML configuration file. Flags override its listener and
    /// logging sections.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    observability::logging::init(args.debug);

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    config.listener.bind_address = args.hostname;
    config.listener.insecure = args.insecure;
    config.listener.cert_file = args.cert_file;
    config.listener.key_file = args.key_file;
    config.log.debug = args.debug;

    validate_config(&config)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        insecure = config.listener.insecure,
        request_timeout_secs = config.timeouts.request_secs,
        shutdown_grace_secs = config.shutdown.grace_secs,
        "configuration loaded"
    );

    let grace = Duration::from_secs(config.shutdown.grace_secs);
    let provider = Arc::new(VaultSessionProvider::default());
    let server = GatewayServer::new(config.clone(), provider);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let mut server_task = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    // A server that stops before any signal arrived did not stop on purpose.
    tokio::select! {
        result = &mut server_task => {
            match result {
                Ok(Err(err)) => tracing::error!(error = %err, "server stopped"),
                Ok(Ok(())) => tracing::error!("server stopped unexpectedly"),
                Err(err) => tracing::error!(error = %err, "server task panicked"),
            }
            std::process::exit(1);
        }
        _ = signals::shutdown_signal() => {}
    }

    tracing::info!("received shutdown signal, gracefully terminating server");
    shutdown.trigger();

    let drain = async {
        match (&mut server_task).await {
            Ok(result) => result.map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        }
    };

    match race_drain(drain, grace).await {
        DrainOutcome::Clean => {
            tracing::info!("all done, goodbye");
        }
        DrainOutcome::Failed(err) => {
            tracing::error!(error = %err, "graceful shutdown failed, forcing shutdown");
            std::process::exit(1);
        }
        DrainOutcome::DeadlineExceeded => {
            tracing::error!("graceful shutdown timed out, forcing shutdown");
            std::process::exit(1);
        }
    }

    Ok(())
}
