use std::{error::Error, time::Duration};

use clap::Parser;
use fixpoint_client::{ClientConfig, FormInput, Handler, InputMode};

/// Ask a fixpoint server for a root of f(x) and print the result.
#[derive(Parser, Debug)]
#[command(name = "fixpoint", version)]
struct Cli {
    /// The function f(x) whose root is sought
    #[arg(long, default_value = "cos(x) - x")]
    function: String,

    /// Initial guess
    #[arg(long, default_value = "1.5")]
    x0: String,

    /// Convergence tolerance
    #[arg(long, default_value = "0.0001")]
    tolerance: String,

    /// Iteration limit
    #[arg(long, default_value = "50")]
    max_iterations: String,

    /// Solver endpoint (overrides FIXPOINT_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides FIXPOINT_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Send unparsable numbers as null instead of rejecting them
    #[arg(long)]
    lenient: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if cli.lenient {
        config = config.with_inputs(InputMode::Lenient);
    }

    let mut handler = Handler::http(config)?;
    let form = FormInput::new(cli.function, cli.x0, cli.tolerance, cli.max_iterations);
    handler.submit(&form).await;

    for line in handler.result().lines() {
        println!("{line}");
    }

    if let Some(chart) = handler.chart().chart() {
        println!();
        println!("{}", chart.series_title);
        for (label, value) in chart.labels.iter().zip(&chart.values) {
            println!("  {label}: {value}");
        }
    }

    Ok(())
}
