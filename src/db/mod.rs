use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client, Collection,
};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::{OperationExt, QueryResult};
use crate::models::Book;

pub mod aggregations;
pub mod books;
pub mod indexes;
pub mod queries;

/// One client, one database, one collection of books.
///
/// Acquired once by the runner and handed to every operation; released with
/// [`Database::close`].
#[derive(Clone)]
pub struct Database {
    client: Client,
    database: mongodb::Database,
    books: Collection<Book>,
}

impl Database {
    /// Connect and ping, so an unreachable server fails here rather than on the first query.
    pub async fn connect(config: &Config) -> QueryResult<Self> {
        let mut options = ClientOptions::parse(&config.mongodb_uri)
            .await
            .during("parse connection string")?;
        options.app_name = Some(config.app_name.clone());
        if let Some(seconds) = config.server_selection_timeout_seconds {
            options.server_selection_timeout = Some(Duration::from_secs(seconds));
        }

        let client = Client::with_options(options).during("create client")?;
        let database = client.database(&config.database_name);
        let books = database.collection::<Book>(&config.collection_name);

        let db = Self {
            client,
            database,
            books,
        };
        db.ping().await?;

        info!(
            "Connected to {} (database '{}', collection '{}')",
            config.mongodb_uri, config.database_name, config.collection_name
        );
        Ok(db)
    }

    pub async fn ping(&self) -> QueryResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .during("ping")?;
        Ok(())
    }

    pub fn books(&self) -> &Collection<Book> {
        &self.books
    }

    pub fn collection_name(&self) -> &str {
        self.books.name()
    }

    pub async fn run_command(
        &self,
        command: Document,
        operation: &'static str,
    ) -> QueryResult<Document> {
        self.database.run_command(command).await.during(operation)
    }

    /// Drop the whole database. Only used to tear down isolated test databases.
    pub async fn drop_database(&self) -> QueryResult<()> {
        self.database.drop().await.during("drop database")
    }

    /// Release the connection. Consumes the handle so nothing can use it afterwards.
    pub async fn close(self) {
        debug!("Closing connection to database '{}'", self.database.name());
        self.client.shutdown().await;
    }
}
