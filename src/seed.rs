use tracing::{info, warn};

use crate::db::Database;
use crate::errors::QueryResult;
use crate::models::Book;

/// The sample catalogue the query battery is written against.
pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new("To Kill a Mockingbird", "Harper Lee", "Fiction", 1960, 12.99, true),
        Book::new("1984", "George Orwell", "Dystopian", 1949, 10.99, true),
        Book::new("The Great Gatsby", "F. Scott Fitzgerald", "Fiction", 1925, 9.99, true),
        Book::new("Brave New World", "Aldous Huxley", "Dystopian", 1932, 11.50, false),
        Book::new("The Hobbit", "J.R.R. Tolkien", "Fantasy", 1937, 14.99, true),
        Book::new("The Catcher in the Rye", "J.D. Salinger", "Fiction", 1951, 8.99, true),
        Book::new("Pride and Prejudice", "Jane Austen", "Romance", 1813, 7.99, true),
        Book::new("The Lord of the Rings", "J.R.R. Tolkien", "Fantasy", 1954, 19.99, true),
        Book::new("Animal Farm", "George Orwell", "Political Satire", 1945, 8.50, false),
        Book::new("The Alchemist", "Paulo Coelho", "Fiction", 1988, 10.99, true),
        Book::new("Moby Dick", "Herman Melville", "Adventure", 1851, 12.50, false),
        Book::new("Wuthering Heights", "Emily Brontë", "Gothic Fiction", 1847, 9.99, true),
    ]
}

/// Insert the sample catalogue.
///
/// With `reset` the collection is dropped first. Without it, a collection
/// that already holds books is left alone. Returns how many books were inserted.
pub async fn seed_books(db: &Database, reset: bool) -> QueryResult<usize> {
    if reset {
        info!("Dropping collection '{}'", db.collection_name());
        db.drop_books().await?;
    } else {
        let existing = db.count_books().await?;
        if existing > 0 {
            warn!(
                "Collection '{}' already has {} books, skipping seed (use --reset to replace them)",
                db.collection_name(),
                existing
            );
            return Ok(0);
        }
    }

    let inserted = db.insert_books(&sample_books()).await?;
    info!("Inserted {} books into '{}'", inserted, db.collection_name());
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_titles_are_unique() {
        let books = sample_books();
        let titles: HashSet<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles.len(), books.len());
    }

    #[test]
    fn test_sample_covers_battery_values() {
        let books = sample_books();
        assert!(books.iter().any(|b| b.title == "1984"));
        assert!(books.iter().any(|b| b.title == "Animal Farm"));
        assert!(books.iter().any(|b| b.genre == "Fantasy"));
        assert!(books
            .iter()
            .any(|b| b.author == "J.R.R. Tolkien" && b.published_year == 1954));
        assert_eq!(
            books.iter().filter(|b| b.author == "George Orwell").count(),
            2
        );
    }

    #[test]
    fn test_sample_books_have_no_ids() {
        assert!(sample_books().iter().all(|b| b.id.is_none()));
    }
}
