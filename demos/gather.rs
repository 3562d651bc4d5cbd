//! Runs a single collection cycle and prints the records in line protocol.
//!
//! Configuration comes from `CLOUDSTACK_API_URL`, `CLOUDSTACK_API_KEY` and
//! `CLOUDSTACK_SECRET_KEY` (a `.env` file is honored), or from a TOML file
//! passed as the first argument. Set `RUST_LOG=cloudstack_collector=debug`
//! to see every API call.

use cloudstack_collector::{CloudStackCollector, CloudStackConfig, CloudStackResult, MemoryAccumulator};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> CloudStackResult<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => CloudStackConfig::from_file(path).await?,
        None => CloudStackConfig::from_env(),
    };

    let collector = CloudStackCollector::from_config(config)?;
    let mut acc = MemoryAccumulator::new();
    collector.gather(&mut acc).await?;

    for emission in acc.emissions() {
        println!("{emission}");
    }
    for error in acc.errors() {
        eprintln!("error: {error}");
    }
    Ok(())
}
