use std::error::Error;

use fixpoint_client::ClientConfig;
use fixpoint_plot::SolverApp;

fn main() -> Result<(), Box<dyn Error>> {
    let config = ClientConfig::from_env()?;
    SolverApp::new(config)?.run()?;
    Ok(())
}
