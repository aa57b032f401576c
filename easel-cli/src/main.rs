use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use colored::*;
use easel::model::IceServerConfig;
use easel::server::{
    DEFAULT_STUN_SERVER, Negotiator, Room, RtcTransportFactory, SignalingService, TransportConfig,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "easel", version, about = "Shared drawing board relay over WebRTC data channels")]
struct Args {
    /// Address the HTTP signaling server binds to.
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: SocketAddr,

    /// STUN/TURN server URL handed to every peer connection. Repeatable.
    #[arg(long = "stun", value_name = "URL", default_value = DEFAULT_STUN_SERVER)]
    stun: Vec<String>,

    /// The drawing page, served at `/`. No other file is exposed.
    #[arg(long, value_name = "FILE", default_value = "index.html")]
    page: PathBuf,

    /// Give up on ICE gathering after this many seconds. Waits indefinitely if unset.
    #[arg(long, value_name = "SECS")]
    ice_timeout_secs: Option<u64>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            ice_servers: self.stun.iter().map(IceServerConfig::stun).collect(),
            ice_gathering_timeout: self.ice_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Signaling routes plus the drawing page at `/`.
fn app(args: &Args) -> Router {
    let room = Arc::new(Room::new());
    let negotiator = Negotiator::new(
        room,
        Arc::new(RtcTransportFactory),
        args.transport_config(),
    );
    let signaling = SignalingService::new(Arc::new(negotiator));

    signaling
        .router()
        .route_service("/", ServeFile::new(&args.page))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = app(&args);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("Failed to bind {}", args.addr))?;

    println!("{}", "🎨 Easel relay is up".green().bold());
    println!("   🌐 Board: http://{}", args.addr);
    println!("   📄 Page: {}", args.page.display());
    info!("Signaling server listening on http://{}", args.addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server stopped")?;

    Ok(())
}
