use std::{error::Error, net::IpAddr};

use clap::Parser;
use fixpoint_expr::Transform;
use fixpoint_server::{ServerConfig, run};

/// Serve fixed-point iteration over HTTP.
#[derive(Parser, Debug)]
#[command(name = "fixpoint-server", version)]
struct Cli {
    /// Address to bind (overrides FIXPOINT_HOST)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Port to bind (overrides FIXPOINT_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// How g(x) is derived from f(x): relaxation or isolate
    #[arg(long)]
    transform: Option<Transform>,

    /// Non-improving steps tolerated before the solver stops
    #[arg(long)]
    patience: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(transform) = cli.transform {
        config.transform = transform;
    }
    if let Some(patience) = cli.patience {
        config.patience = patience;
    }
    config.validate()?;

    run(config).await;
    Ok(())
}
