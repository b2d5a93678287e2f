use tracing::{error, info};

use bookstore_queries::{config::Config, runner, RunnerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("bookstore_queries=info,mongodb=warn")
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let config = Config::from_env()?;
    let settings = RunnerSettings::default();

    match runner::run(&config, &settings).await {
        Ok(report) => {
            info!(
                "✅ Query battery finished: {} books listed, {} indexes in place",
                report.by_price_ascending.len(),
                report.index_names.len()
            );
            Ok(())
        }
        Err(e) => {
            error!("❌ Error occurred: {}", e);
            std::process::exit(1);
        }
    }
}
