//! The fixed query battery.
//!
//! [`run`] owns the connection for the whole battery: it connects, hands the
//! [`Database`] to a [`QueryRunner`], and closes it again whether the battery
//! finished or stopped at the first failing operation.

use tracing::info;

use crate::config::Config;
use crate::db::{queries, Database};
use crate::errors::QueryResult;
use crate::models::{
    titles, AuthorBookCount, Book, BookSummary, DecadeCount, ExecutionStats, GenrePriceStats,
    PageRequest, SortDirection, UpdateOutcome,
};

/// Values plugged into the battery. The defaults are the bookstore queries.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub genre: String,
    pub published_after: i32,
    pub author: String,
    pub price_update_title: String,
    pub new_price: f64,
    pub delete_title: String,
    pub in_stock_published_after: i32,
    pub projection_genre: String,
    pub page: PageRequest,
    pub explain_author: String,
    pub explain_year: i32,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            genre: "Fiction".to_string(),
            published_after: 1950,
            author: "George Orwell".to_string(),
            price_update_title: "1984".to_string(),
            new_price: 11.99,
            delete_title: "Animal Farm".to_string(),
            in_stock_published_after: 2010,
            projection_genre: "Fantasy".to_string(),
            page: PageRequest::new(2, 5),
            explain_author: "J.R.R. Tolkien".to_string(),
            explain_year: 1954,
        }
    }
}

/// Everything the battery produced, in the order it ran.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub genre_titles: Vec<String>,
    pub published_after_titles: Vec<String>,
    pub author_titles: Vec<String>,
    pub price_update: Option<UpdateOutcome>,
    pub deleted: u64,
    pub in_stock_recent_titles: Vec<String>,
    pub projected: Vec<BookSummary>,
    pub by_price_ascending: Vec<Book>,
    pub by_price_descending: Vec<Book>,
    pub page: Vec<Book>,
    pub average_price_by_genre: Vec<GenrePriceStats>,
    pub top_author: Option<AuthorBookCount>,
    pub books_by_decade: Vec<DecadeCount>,
    pub index_names: Vec<String>,
    pub single_field_plan: Option<ExecutionStats>,
    pub compound_plan: Option<ExecutionStats>,
}

pub struct QueryRunner<'a> {
    db: &'a Database,
    settings: &'a RunnerSettings,
}

impl<'a> QueryRunner<'a> {
    pub fn new(db: &'a Database, settings: &'a RunnerSettings) -> Self {
        Self { db, settings }
    }

    /// Run every section in order, stopping at the first error.
    pub async fn run_all(&self) -> QueryResult<RunReport> {
        let mut report = RunReport::default();
        self.basic_crud(&mut report).await?;
        self.advanced_queries(&mut report).await?;
        self.aggregations(&mut report).await?;
        self.indexing(&mut report).await?;
        Ok(report)
    }

    pub async fn basic_crud(&self, report: &mut RunReport) -> QueryResult<()> {
        let s = self.settings;
        info!("=== Basic CRUD Operations ===");

        report.genre_titles = titles(&self.db.find_by_genre(&s.genre).await?);
        info!("{} books: {:?}", s.genre, report.genre_titles);

        report.published_after_titles =
            titles(&self.db.find_published_after(s.published_after).await?);
        info!(
            "Books published after {}: {:?}",
            s.published_after, report.published_after_titles
        );

        report.author_titles = titles(&self.db.find_by_author(&s.author).await?);
        info!("Books by {}: {:?}", s.author, report.author_titles);

        let outcome = self
            .db
            .update_price(&s.price_update_title, s.new_price)
            .await?;
        info!(
            "Updated {} price: {} document modified",
            s.price_update_title, outcome.modified
        );
        report.price_update = Some(outcome);

        report.deleted = self.db.delete_by_title(&s.delete_title).await?;
        info!("Deleted {}: {} document deleted", s.delete_title, report.deleted);

        Ok(())
    }

    pub async fn advanced_queries(&self, report: &mut RunReport) -> QueryResult<()> {
        let s = self.settings;
        info!("=== Advanced Queries ===");

        report.in_stock_recent_titles = titles(
            &self
                .db
                .find_in_stock_published_after(s.in_stock_published_after)
                .await?,
        );
        info!(
            "In stock and published after {}: {:?}",
            s.in_stock_published_after, report.in_stock_recent_titles
        );

        report.projected = self.db.find_summaries_by_genre(&s.projection_genre).await?;
        info!(
            "{} books with projection: {}",
            s.projection_genre,
            to_json(&report.projected)
        );

        report.by_price_ascending = self.db.list_by_price(SortDirection::Ascending).await?;
        info!(
            "Books by price (ascending): {:?}",
            price_labels(&report.by_price_ascending)
        );

        report.by_price_descending = self.db.list_by_price(SortDirection::Descending).await?;
        info!(
            "Books by price (descending): {:?}",
            price_labels(&report.by_price_descending)
        );

        report.page = self.db.list_page(s.page).await?;
        info!(
            "Page {} results ({} per page): {:?}",
            s.page.page,
            s.page.per_page,
            titles(&report.page)
        );

        Ok(())
    }

    pub async fn aggregations(&self, report: &mut RunReport) -> QueryResult<()> {
        info!("=== Aggregation Pipeline ===");

        report.average_price_by_genre = self.db.average_price_by_genre().await?;
        info!(
            "Average price by genre: {}",
            to_json(&report.average_price_by_genre)
        );

        report.top_author = self.db.most_prolific_author().await?;
        match &report.top_author {
            Some(top) => info!(
                "Author with most books: {} ({} books)",
                top.author, top.book_count
            ),
            None => info!("Author with most books: none, collection is empty"),
        }

        report.books_by_decade = self.db.books_by_decade().await?;
        let decades: Vec<String> = report
            .books_by_decade
            .iter()
            .map(|row| format!("{}: {}", row.label(), row.count))
            .collect();
        info!("Books by decade: {:?}", decades);

        Ok(())
    }

    pub async fn indexing(&self, report: &mut RunReport) -> QueryResult<()> {
        let s = self.settings;
        info!("=== Indexing ===");

        report.index_names = self.db.create_book_indexes().await?;
        info!("Indexes created successfully: {:?}", report.index_names);

        let single = self
            .db
            .explain_find(queries::by_author(&s.explain_author))
            .await?;
        let compound = self
            .db
            .explain_find(queries::by_author_and_year(&s.explain_author, s.explain_year))
            .await?;

        info!(
            "Query without compound index (totalDocsExamined): {}",
            single.total_docs_examined
        );
        info!(
            "Query with compound index (totalDocsExamined): {}",
            compound.total_docs_examined
        );
        report.single_field_plan = Some(single);
        report.compound_plan = Some(compound);

        Ok(())
    }
}

/// Connect, run the whole battery, and release the connection on every path.
pub async fn run(config: &Config, settings: &RunnerSettings) -> QueryResult<RunReport> {
    let db = Database::connect(config).await?;
    let result = QueryRunner::new(&db, settings).run_all().await;
    db.close().await;
    result
}

fn price_labels(books: &[Book]) -> Vec<String> {
    books.iter().map(Book::price_label).collect()
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unprintable: {}>", e))
}
