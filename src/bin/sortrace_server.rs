//! sortrace gRPC Server
//!
//! A standalone server binary for running step-recording sorts over gRPC.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tonic::transport::Server;
use tracing_subscriber::EnvFilter;

use sortrace::dispatch::{DispatchConfig, Dispatcher};
use sortrace::runtime::{RuntimeConfig, SortRuntime};
use sortrace::transport::SortServiceImpl;
use sortrace::AlgorithmRegistry;

/// Server configuration
struct Config {
    /// Address to bind to
    addr: SocketAddr,
    /// Per-request element limit
    max_elements: usize,
    /// Per-request worst-case step budget
    max_trace_steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 50052)),
            max_elements: DispatchConfig::default().max_elements,
            max_trace_steps: DispatchConfig::default().max_trace_steps,
        }
    }
}

fn parse_args() -> Config {
    let args: Vec<String> = std::env::args().collect();
    let mut config = Config::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    let port: u16 = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("error: invalid port number: {}", args[i + 1]);
                        std::process::exit(1);
                    });
                    config.addr.set_port(port);
                    i += 2;
                } else {
                    eprintln!("error: --port requires a value");
                    std::process::exit(1);
                }
            }
            "--max-elements" | "-m" => {
                if i + 1 < args.len() {
                    config.max_elements = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("error: invalid element limit: {}", args[i + 1]);
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("error: --max-elements requires a value");
                    std::process::exit(1);
                }
            }
            "--max-trace-steps" | "-s" => {
                if i + 1 < args.len() {
                    config.max_trace_steps = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("error: invalid step budget: {}", args[i + 1]);
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("error: --max-trace-steps requires a value");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                println!("sortrace-server - step-recording sort service");
                println!();
                println!("USAGE:");
                println!("    sortrace-server [OPTIONS]");
                println!();
                println!("OPTIONS:");
                println!("    -p, --port <PORT>            Port to listen on [default: 50052]");
                println!("    -m, --max-elements <N>       Largest accepted array [default: 10000]");
                println!("    -s, --max-trace-steps <N>    Worst-case steps per batch [default: 1500000]");
                println!("    -h, --help                   Print help information");
                println!();
                println!("Log verbosity is controlled by RUST_LOG [default: info].");
                std::process::exit(0);
            }
            arg => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
        }
    }

    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dispatcher = Dispatcher::new(
        AlgorithmRegistry::default(),
        DispatchConfig {
            max_elements: config.max_elements,
            max_trace_steps: config.max_trace_steps,
            ..DispatchConfig::default()
        },
    );
    let runtime = Arc::new(SortRuntime::new(dispatcher, RuntimeConfig::default()));
    let svc = SortServiceImpl::new(runtime).into_server();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.addr,
        max_elements = config.max_elements,
        max_trace_steps = config.max_trace_steps,
        "starting sortrace gRPC server"
    );

    Server::builder()
        .add_service(svc)
        .serve_with_shutdown(config.addr, async {
            let _ = signal::ctrl_c().await;
        })
        .await?;

    tracing::info!("shut down");
    Ok(())
}
