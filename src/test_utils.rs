//! Test harness backed by a real MongoDB container
//!
//! One container is started per test binary and shared by every test in it.
//! Each [`TestContext`] gets its own uniquely named database, so tests can
//! seed, mutate and index freely without seeing each other's books.

use std::sync::Mutex;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mongo::Mongo;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::db::Database;
use crate::models::Book;
use crate::seed::sample_books;

type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Shared MongoDB container, started on first use
static SHARED_MONGO: OnceCell<SharedMongo> = OnceCell::const_new();

struct SharedMongo {
    // Held so the container lives as long as the test binary
    _container: Mutex<ContainerAsync<Mongo>>,
    mongodb_uri: String,
}

impl SharedMongo {
    async fn start() -> TestResult<SharedMongo> {
        let container = Mongo::default()
            .start()
            .await
            .map_err(|e| format!("Failed to start shared mongo container: {}", e))?;

        let port = container
            .get_host_port_ipv4(27017)
            .await
            .map_err(|e| format!("Failed to get mongo port: {}", e))?;

        Ok(SharedMongo {
            _container: Mutex::new(container),
            mongodb_uri: format!("mongodb://127.0.0.1:{}", port),
        })
    }
}

async fn shared_mongodb_uri() -> TestResult<String> {
    let shared = SHARED_MONGO.get_or_try_init(SharedMongo::start).await?;
    Ok(shared.mongodb_uri.clone())
}

/// A connected database unique to one test
pub struct TestContext {
    pub db: Database,
    pub config: Config,
}

impl TestContext {
    /// Connect to a fresh, empty database on the shared container.
    pub async fn new() -> TestResult<Self> {
        let mongodb_uri = shared_mongodb_uri().await?;
        let database_name = format!("bookstore_test_{}", uuid::Uuid::new_v4().simple());

        let config = Config::from_lookup(|key| match key {
            "MONGODB_URI" => Some(mongodb_uri.clone()),
            "SERVER_SELECTION_TIMEOUT_SECONDS" => Some("5".to_string()),
            _ => None,
        })
        .with_database_name(database_name);

        // The container reports ready before mongod accepts connections on some hosts
        let mut retries = 0;
        const MAX_RETRIES: u32 = 6;
        let db = loop {
            match Database::connect(&config).await {
                Ok(db) => break db,
                Err(e) => {
                    if retries == MAX_RETRIES - 1 {
                        return Err(format!(
                            "Failed to connect to test database after {} retries: {}",
                            MAX_RETRIES, e
                        )
                        .into());
                    }
                    retries += 1;
                    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                }
            }
        };

        Ok(Self { db, config })
    }

    /// Fresh database holding the sample catalogue.
    pub async fn with_sample_books() -> TestResult<Self> {
        let ctx = Self::new().await?;
        ctx.seed(&sample_books()).await?;
        Ok(ctx)
    }

    pub async fn seed(&self, books: &[Book]) -> TestResult<usize> {
        Ok(self.db.insert_books(books).await?)
    }

    /// Drop the test database and release the connection.
    pub async fn cleanup_and_close(self) -> TestResult<()> {
        let dropped = self.db.drop_database().await;
        self.db.close().await;
        dropped?;
        Ok(())
    }
}

/// Build a [`TestContext`] or skip the current test when no container runtime is available.
///
/// Pass `sample` to seed the sample catalogue.
#[macro_export]
macro_rules! test_context_or_skip {
    () => {
        match $crate::test_utils::TestContext::new().await {
            Ok(ctx) => ctx,
            Err(e) => {
                println!("Skipping test: MongoDB test container unavailable: {}", e);
                return;
            }
        }
    };
    (sample) => {
        match $crate::test_utils::TestContext::with_sample_books().await {
            Ok(ctx) => ctx,
            Err(e) => {
                println!("Skipping test: MongoDB test container unavailable: {}", e);
                return;
            }
        }
    };
}
