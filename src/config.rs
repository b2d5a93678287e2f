use anyhow::Result;
use std::env;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE_NAME: &str = "plp_bookstore";
pub const DEFAULT_COLLECTION_NAME: &str = "books";
pub const DEFAULT_APP_NAME: &str = "bookstore-queries";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongodb_uri: String,
    pub database_name: String,
    pub collection_name: String,
    pub app_name: String,
    pub server_selection_timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Resolve every setting through `lookup`, falling back to the local defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            mongodb_uri: lookup("MONGODB_URI")
                .unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string()),
            database_name: lookup("DATABASE_NAME")
                .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            collection_name: lookup("COLLECTION_NAME")
                .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string()),
            app_name: lookup("MONGODB_APP_NAME")
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            server_selection_timeout_seconds: lookup("SERVER_SELECTION_TIMEOUT_SECONDS")
                .and_then(|s| s.trim().parse().ok()),
        }
    }

    /// Same settings pointed at another database, used to isolate test runs.
    pub fn with_database_name(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = database_name.into();
        self
    }
}
