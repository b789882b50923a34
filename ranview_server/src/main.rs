//! RanView dashboard backend CLI
//!
//! Starts the JSON API in front of a remote ns-3 simulator host.

use clap::Parser;
use ranview_core::SimulationController;
use ranview_env::{GatewayConfig, HttpGateway, MemoryGateway, SimulatorGateway, HOST_ENV_VAR};
use ranview_server::{serve, AppState, ServerError};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// RanView dashboard backend
#[derive(Parser, Debug)]
#[command(name = "ranview")]
#[command(
    about = "Start, stop and poll a remote ns-3 simulator for the RanView dashboard",
    long_about = None
)]
struct Args {
    /// Simulator host (name or IP, no scheme)
    #[arg(long, env = "NS3_HOST")]
    ns3_host: Option<String>,

    /// Address the dashboard API listens on
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    listen: SocketAddr,

    /// Telemetry port on the simulator host
    #[arg(long, default_value_t = ranview_env::TELEMETRY_PORT)]
    telemetry_port: u16,

    /// Per-request timeout towards the simulator, in milliseconds
    #[arg(long, default_value = "5000")]
    timeout_ms: u64,

    /// Launcher prefix for start commands
    #[arg(long, default_value = "./waf --run")]
    launcher: String,

    /// Run against an in-memory simulator (no ns-3 host needed)
    #[arg(long)]
    offline: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

async fn run<G: SimulatorGateway>(args: &Args, gateway: Arc<G>) -> Result<(), ServerError> {
    let controller = SimulationController::new(gateway).with_launcher(args.launcher.clone());
    serve(args.listen, AppState::new(controller)).await
}

async fn run_with_host(args: &Args, host: &str) -> Result<(), ServerError> {
    let config = GatewayConfig::new(host)
        .with_telemetry_port(args.telemetry_port)
        .with_timeout(Duration::from_millis(args.timeout_ms));

    let gateway = HttpGateway::shared(config)?;
    info!(
        "Simulator control at {}, stop at {}",
        gateway.config().url(ranview_env::Endpoint::Control),
        gateway.config().url(ranview_env::Endpoint::Stop)
    );
    run(args, gateway).await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging (RUST_LOG overrides --verbose)
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Error: failed to set tracing subscriber");
        std::process::exit(1);
    }

    info!("RanView dashboard backend v{}", env!("CARGO_PKG_VERSION"));

    let result = if args.offline {
        warn!("Offline mode: commands are recorded in memory, no simulator is contacted");
        run(&args, Arc::new(MemoryGateway::new())).await
    } else {
        match args.ns3_host.as_deref() {
            Some(host) => run_with_host(&args, host).await,
            None => {
                error!("{} environment variable is not set (or pass --ns3-host)", HOST_ENV_VAR);
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
