use futures::TryStreamExt;
use mongodb::bson::{from_document, Document};
use serde::de::DeserializeOwned;

use super::{queries, Database};
use crate::errors::{OperationExt, QueryResult};
use crate::models::{AuthorBookCount, DecadeCount, GenrePriceStats};

impl Database {
    /// Run `pipeline` over the books collection and decode every output row as `T`.
    pub async fn aggregate_rows<T>(
        &self,
        pipeline: Vec<Document>,
        operation: &'static str,
    ) -> QueryResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let documents: Vec<Document> = self
            .books()
            .aggregate(pipeline)
            .await
            .during(operation)?
            .try_collect()
            .await
            .during(operation)?;

        documents
            .into_iter()
            .map(|document| from_document::<T>(document).during(operation))
            .collect()
    }

    pub async fn average_price_by_genre(&self) -> QueryResult<Vec<GenrePriceStats>> {
        self.aggregate_rows(queries::average_price_by_genre(), "average price by genre")
            .await
    }

    /// `None` only when the collection is empty.
    pub async fn most_prolific_author(&self) -> QueryResult<Option<AuthorBookCount>> {
        let rows = self
            .aggregate_rows(queries::most_prolific_author(), "author with most books")
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn books_by_decade(&self) -> QueryResult<Vec<DecadeCount>> {
        self.aggregate_rows(queries::books_by_decade(), "books by decade")
            .await
    }
}
