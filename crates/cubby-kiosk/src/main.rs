//! Cubby kiosk entry point.
//!
//! # Usage
//!
//! ```bash
//! # Local backend and controller
//! cubby-kiosk
//!
//! # Explicit endpoints
//! cubby-kiosk --api-url http://backend:8000 --stream-base ws://controller:8000 --locker-id 3
//! ```
//!
//! Commands on stdin: `deposit <email>`, `pin <digits>`, `reset`, `quit`.

mod console;

use std::time::Duration;

use clap::Parser;
use cubby_app::Runtime;
use cubby_core::{KioskConfig, SystemEnv};
use cubby_gateway::{GatewayClient, LockerBackend};
use cubby_stream::{StreamClient, StreamConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::console::ConsoleDriver;

/// Cubby storage-locker kiosk
#[derive(Parser, Debug)]
#[command(name = "cubby-kiosk")]
#[command(about = "Kiosk frontend for an unattended storage locker")]
#[command(version)]
struct Args {
    /// Base URL of the locker backend API
    #[arg(long, default_value = "http://localhost:8000")]
    api_url: String,

    /// Base WebSocket URL of the locker controller
    #[arg(long, default_value = "ws://localhost:8000")]
    stream_base: String,

    /// Locker to drive
    #[arg(long, default_value = "1")]
    locker_id: String,

    /// Open-phase duration in seconds (fallback countdown)
    #[arg(long, default_value = "10")]
    open_secs: u64,

    /// Post-retrieval return-to-idle delay in seconds
    #[arg(long, default_value = "5")]
    reset_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = KioskConfig {
        locker_id: args.locker_id.clone(),
        open_duration: Duration::from_secs(args.open_secs),
        reset_delay: Duration::from_secs(args.reset_secs),
        ..KioskConfig::default()
    };

    tracing::info!(locker = %config.locker_id, api = %args.api_url, "cubby kiosk starting");

    let gateway = GatewayClient::new(&args.api_url)?;

    // Out-of-band reachability probe; the kiosk starts either way and the
    // session derives its state from events, not from this snapshot.
    match gateway.locker_status(&config.locker_id).await {
        Ok(snapshot) => {
            tracing::info!(status = %snapshot.status, "backend reachable");
        },
        Err(error) => {
            tracing::warn!(%error, "backend unreachable at startup");
        },
    }

    let stream_url = format!(
        "{}/ws/locker/{}",
        args.stream_base.trim_end_matches('/'),
        config.locker_id
    );
    let mut stream = StreamClient::new(StreamConfig::new(stream_url));
    let updates = stream.subscribe();
    stream.connect()?;

    let runtime = Runtime::new(ConsoleDriver::new(), gateway, SystemEnv::new(), config, updates);
    let result = runtime.run().await;

    stream.disconnect().await;
    tracing::info!("cubby kiosk stopped");

    Ok(result?)
}
