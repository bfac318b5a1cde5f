//! ciscopolld - Prometheus exporter for Cisco devices.
//!
//! Each scrape polls the configured devices over SSH and answers with
//! BGP session, version, memory and CPU metrics.

mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use ciscopoll_core::collector::DevicePoller;
use ciscopoll_core::config::{ConfigError, Inventory};
use ciscopoll_core::dialect::{Dialect, UnknownDialect};
use ciscopoll_core::facts::FactExtractor;
use ciscopoll_core::metrics::Exposition;
use ciscopoll_core::session::SshConfig;

use state::{AppState, SharedState};

// ============================================================
// CLI
// ============================================================

#[derive(Parser, Debug)]
#[command(name = "ciscopolld", about = "Prometheus exporter for Cisco devices", version = ciscopoll_core::VERSION)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:9362", env = "CISCOPOLL_LISTEN")]
    listen: String,

    /// Path under which metrics are exposed.
    #[arg(long, default_value = "/metrics", env = "CISCOPOLL_TELEMETRY_PATH")]
    telemetry_path: String,

    /// Comma-separated list of device hosts.
    #[arg(long, env = "CISCOPOLL_TARGETS", value_delimiter = ',')]
    targets: Vec<String>,

    /// JSON inventory with per-device settings.
    #[arg(long, env = "CISCOPOLL_INVENTORY")]
    inventory: Option<PathBuf>,

    /// SSH user.
    #[arg(long, env = "CISCOPOLL_SSH_USER")]
    ssh_user: Option<String>,

    /// SSH identity file.
    #[arg(long, env = "CISCOPOLL_SSH_KEYFILE")]
    ssh_keyfile: Option<PathBuf>,

    /// SSH port.
    #[arg(long, default_value = "22", env = "CISCOPOLL_SSH_PORT")]
    ssh_port: u16,

    /// Connect and per-command timeout in seconds.
    #[arg(long, default_value = "5", env = "CISCOPOLL_SSH_TIMEOUT")]
    ssh_timeout: u64,

    /// Device dialect (IOS, IOSXE, NXOS, IOSXR), or "auto" to detect from `show version`.
    #[arg(long, default_value = "auto", env = "CISCOPOLL_DIALECT")]
    dialect: String,

    /// Enable the BGP collector. Disable with --bgp=false.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, env = "CISCOPOLL_BGP")]
    bgp: bool,

    /// Enable the facts collector (version, memory, CPU). Disable with --facts=false.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, env = "CISCOPOLL_FACTS")]
    facts: bool,

    /// Log extraction failures at warn level.
    #[arg(long, env = "CISCOPOLL_DEBUG")]
    debug: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber.
///
/// Default level is INFO. `RUST_LOG` directives take precedence.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Transport settings shared by every device without an inventory override.
fn ssh_defaults(args: &Args) -> Result<SshConfig, UnknownDialect> {
    let dialect = if args.dialect.eq_ignore_ascii_case("auto") {
        None
    } else {
        Some(args.dialect.parse::<Dialect>()?)
    };

    Ok(SshConfig {
        user: args.ssh_user.clone(),
        port: args.ssh_port,
        key_file: args.ssh_keyfile.clone(),
        timeout: Duration::from_secs(args.ssh_timeout),
        dialect,
        debug: args.debug,
        ..SshConfig::default()
    })
}

/// Inventory file entries first, then `--targets` hosts not already listed.
fn load_inventory(args: &Args) -> Result<Inventory, ConfigError> {
    let mut inventory = match &args.inventory {
        Some(path) => Inventory::load(path)?,
        None => Inventory::default(),
    };
    inventory.merge(Inventory::from_hosts(&args.targets));
    Ok(inventory)
}

// ============================================================
// Main
// ============================================================

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to build tokio runtime");
            process::exit(1);
        }
    };
    runtime.block_on(async_main(args));
}

async fn async_main(args: Args) {
    info!(version = ciscopoll_core::VERSION, "ciscopolld starting");

    let defaults = match ssh_defaults(&args) {
        Ok(defaults) => defaults,
        Err(e) => {
            error!(error = %e, "invalid --dialect");
            process::exit(1);
        }
    };

    let inventory = match load_inventory(&args) {
        Ok(inventory) => inventory,
        Err(e) => {
            error!(error = %e, "failed to load inventory");
            process::exit(1);
        }
    };
    if inventory.devices.is_empty() {
        warn!("no targets configured; only ?target= scrapes will poll devices");
    }

    let extractor = match FactExtractor::new() {
        Ok(extractor) => extractor,
        Err(e) => {
            error!(error = %e, "failed to compile patterns");
            process::exit(1);
        }
    };
    let poller = DevicePoller::with_collectors(extractor, args.bgp, args.facts);
    let exposition = match Exposition::new(poller.descriptors()) {
        Ok(exposition) => exposition,
        Err(e) => {
            error!(error = %e, "invalid metric descriptors");
            process::exit(1);
        }
    };

    info!(
        targets = inventory.devices.len(),
        collectors = ?poller.collector_names(),
        "configured"
    );

    let state: SharedState = Arc::new(AppState {
        poller,
        exposition,
        inventory,
        defaults,
        opener: state::ssh_opener(),
    });

    let app = handlers::router(state, &args.telemetry_path);

    let addr: SocketAddr = match args.listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(listen = %args.listen, error = %e, "invalid listen address");
            process::exit(1);
        }
    };
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(%addr, path = %args.telemetry_path, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        process::exit(1);
    }
    info!("ciscopolld stopped");
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ciscopolld").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.listen, "0.0.0.0:9362");
        assert_eq!(args.telemetry_path, "/metrics");
        assert!(args.bgp);
        assert!(args.facts);

        let ssh = ssh_defaults(&args).unwrap();
        assert_eq!(ssh.port, 22);
        assert_eq!(ssh.timeout, Duration::from_secs(5));
        assert_eq!(ssh.dialect, None);
        assert!(!ssh.debug);
    }

    #[test]
    fn test_collector_toggles() {
        let args = parse(&["--bgp=false", "--facts", "true"]);
        assert!(!args.bgp);
        assert!(args.facts);
    }

    #[test]
    fn test_dialect_flag() {
        let args = parse(&["--dialect", "iosxr", "--debug"]);
        let ssh = ssh_defaults(&args).unwrap();
        assert_eq!(ssh.dialect, Some(Dialect::IosXr));
        assert!(ssh.debug);

        let args = parse(&["--dialect", "junos"]);
        assert!(ssh_defaults(&args).is_err());
    }

    #[test]
    fn test_targets_merge_with_inventory() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"devices": [{{"host": "edge1", "port": 2222}}, {{"host": "sw1"}}]}}"#
        )
        .unwrap();
        let path = file.path().display().to_string();
        let args = parse(&["--inventory", &path, "--targets", "sw1,nx1"]);

        let inventory = load_inventory(&args).unwrap();
        assert_eq!(inventory.hosts(), vec!["edge1", "sw1", "nx1"]);
        assert_eq!(inventory.get("edge1").unwrap().port, Some(2222));
    }

    #[test]
    fn test_missing_inventory_is_error() {
        let args = parse(&["--inventory", "/nonexistent/inventory.json"]);
        assert!(load_inventory(&args).is_err());
    }
}
