#![cfg(not(tarpaulin_include))]

use dashboard::app;
use dashboard::config::DashboardConfig;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::from_args(env::args())?;
    log::info!(
        "Starting dashboard with data file {}",
        config.data_file.display()
    );

    app::run(config).await
}
