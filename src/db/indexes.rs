use mongodb::{
    bson::{doc, Document},
    IndexModel,
};
use tracing::debug;

use super::{queries, Database};
use crate::errors::{OperationExt, QueryError, QueryResult};
use crate::models::ExecutionStats;

/// Key patterns of the indexes the runner maintains, in creation order.
pub fn book_index_keys() -> Vec<Document> {
    vec![
        doc! { "title": 1 },
        doc! { "author": 1, "published_year": 1 },
    ]
}

impl Database {
    /// Create the title index and the (author, published_year) index.
    ///
    /// The server treats re-creating an identical index as a no-op, so this is
    /// safe to call on every run. Returns the index names.
    pub async fn create_book_indexes(&self) -> QueryResult<Vec<String>> {
        let mut names = Vec::new();
        for keys in book_index_keys() {
            let result = self
                .books()
                .create_index(IndexModel::builder().keys(keys).build())
                .await
                .during("create index")?;
            debug!("Index '{}' ready", result.index_name);
            names.push(result.index_name);
        }
        Ok(names)
    }

    pub async fn list_index_names(&self) -> QueryResult<Vec<String>> {
        self.books()
            .list_index_names()
            .await
            .during("list indexes")
    }

    /// Execute `filter` under `explain` and report what the server examined.
    pub async fn explain_find(&self, filter: Document) -> QueryResult<ExecutionStats> {
        const OPERATION: &str = "explain find";

        let explain = self
            .run_command(queries::explain_find(self.collection_name(), filter), OPERATION)
            .await?;

        ExecutionStats::from_explain(&explain).ok_or_else(|| {
            QueryError::unexpected(OPERATION, "explain output has no executionStats section")
        })
    }
}
