mod agents;
mod config;
mod error;
mod fetcher;
mod scraper;
mod sink;
mod timestamps;
mod types;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{HttpTransport, TokioSleeper};
use crate::scraper::Scraper;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    info!(
        "scanning jackpot archive {}-{:02} through {}-{:02}",
        cfg.start_year, cfg.start_month, cfg.end_year, cfg.end_month
    );

    let transport = HttpTransport::new(cfg.http_timeout_secs)?;
    let sleeper = TokioSleeper;
    let mut scraper = Scraper::new(&cfg, &transport, &sleeper);

    scraper.run().await;

    sink::write_outputs(&scraper.state, &cfg)?;
    info!("scraping complete");
    Ok(())
}
