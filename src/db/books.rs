use futures::TryStreamExt;
use mongodb::bson::{doc, Document};

use super::{queries, Database};
use crate::errors::{OperationExt, QueryResult};
use crate::models::{Book, BookSummary, PageRequest, SortDirection, UpdateOutcome};

impl Database {
    pub async fn find_books(
        &self,
        filter: Document,
        operation: &'static str,
    ) -> QueryResult<Vec<Book>> {
        self.books()
            .find(filter)
            .await
            .during(operation)?
            .try_collect()
            .await
            .during(operation)
    }

    pub async fn find_by_genre(&self, genre: &str) -> QueryResult<Vec<Book>> {
        self.find_books(queries::by_genre(genre), "find books by genre").await
    }

    pub async fn find_published_after(&self, year: i32) -> QueryResult<Vec<Book>> {
        self.find_books(queries::published_after(year), "find books published after year")
            .await
    }

    pub async fn find_by_author(&self, author: &str) -> QueryResult<Vec<Book>> {
        self.find_books(queries::by_author(author), "find books by author").await
    }

    pub async fn find_in_stock_published_after(&self, year: i32) -> QueryResult<Vec<Book>> {
        self.find_books(
            queries::in_stock_published_after(year),
            "find in-stock books published after year",
        )
        .await
    }

    /// Title, author and price of every book in `genre`, without `_id`.
    pub async fn find_summaries_by_genre(&self, genre: &str) -> QueryResult<Vec<BookSummary>> {
        const OPERATION: &str = "find projected books by genre";

        self.books()
            .clone_with_type::<BookSummary>()
            .find(queries::by_genre(genre))
            .projection(queries::summary_projection())
            .await
            .during(OPERATION)?
            .try_collect()
            .await
            .during(OPERATION)
    }

    pub async fn list_by_price(&self, direction: SortDirection) -> QueryResult<Vec<Book>> {
        const OPERATION: &str = "list books by price";

        self.books()
            .find(doc! {})
            .sort(direction.sort_by("price"))
            .await
            .during(OPERATION)?
            .try_collect()
            .await
            .during(OPERATION)
    }

    /// One page of all books in insertion order.
    pub async fn list_page(&self, page: PageRequest) -> QueryResult<Vec<Book>> {
        const OPERATION: &str = "list page of books";

        if page.is_empty() {
            return Ok(Vec::new());
        }

        self.books()
            .find(doc! {})
            .sort(queries::insertion_order())
            .skip(page.offset())
            .limit(page.limit())
            .await
            .during(OPERATION)?
            .try_collect()
            .await
            .during(OPERATION)
    }

    /// Set the price of the first book titled `title`. Zero matches is not an error.
    pub async fn update_price(&self, title: &str, price: f64) -> QueryResult<UpdateOutcome> {
        let result = self
            .books()
            .update_one(queries::by_title(title), queries::set_price(price))
            .await
            .during("update book price")?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    /// Delete the first book titled `title`, returning how many were removed (0 or 1).
    pub async fn delete_by_title(&self, title: &str) -> QueryResult<u64> {
        let result = self
            .books()
            .delete_one(queries::by_title(title))
            .await
            .during("delete book by title")?;

        Ok(result.deleted_count)
    }

    pub async fn insert_books(&self, books: &[Book]) -> QueryResult<usize> {
        if books.is_empty() {
            return Ok(0);
        }

        let result = self
            .books()
            .insert_many(books)
            .await
            .during("insert books")?;

        Ok(result.inserted_ids.len())
    }

    pub async fn count_books(&self) -> QueryResult<u64> {
        self.books()
            .count_documents(doc! {})
            .await
            .during("count books")
    }

    pub async fn drop_books(&self) -> QueryResult<()> {
        self.books().drop().await.during("drop books collection")
    }
}
