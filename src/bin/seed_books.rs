/*!
 * CLI tool to load the sample book catalogue
 *
 * Fills the configured collection with the books the query battery expects.
 *
 * Usage: cargo run --bin seed_books -- [--reset]
 */

use anyhow::Result;
use clap::{Arg, Command};
use tracing::{error, info};

use bookstore_queries::{config::Config, db::Database, seed};

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("bookstore_queries=info,seed_books=info,mongodb=warn")
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let matches = Command::new("seed_books")
        .about("Load the sample book catalogue into the configured collection")
        .arg(
            Arg::new("reset")
                .help("Drop the collection before inserting")
                .long("reset")
                .short('r')
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let reset = matches.get_flag("reset");

    let config = Config::from_env()?;
    info!(
        "📚 Seeding {}.{} at {}",
        config.database_name, config.collection_name, config.mongodb_uri
    );

    let db = Database::connect(&config).await?;
    let result = seed::seed_books(&db, reset).await;
    db.close().await;

    match result {
        Ok(0) => info!("Nothing inserted"),
        Ok(count) => info!("✅ Seeded {} books", count),
        Err(e) => {
            error!("❌ Failed to seed books: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
