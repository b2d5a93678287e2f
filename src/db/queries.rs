//! Filter, update and pipeline documents for the book queries.
//!
//! Kept free of I/O so their shape can be checked without a server.

use mongodb::bson::{doc, Document};

pub fn by_genre(genre: &str) -> Document {
    doc! { "genre": genre }
}

pub fn by_author(author: &str) -> Document {
    doc! { "author": author }
}

pub fn by_title(title: &str) -> Document {
    doc! { "title": title }
}

/// Strictly after `year`; the boundary year itself is excluded.
pub fn published_after(year: i32) -> Document {
    doc! { "published_year": { "$gt": year } }
}

pub fn in_stock_published_after(year: i32) -> Document {
    doc! {
        "in_stock": true,
        "published_year": { "$gt": year },
    }
}

pub fn by_author_and_year(author: &str, year: i32) -> Document {
    doc! { "author": author, "published_year": year }
}

pub fn set_price(price: f64) -> Document {
    doc! { "$set": { "price": price } }
}

pub fn summary_projection() -> Document {
    doc! { "title": 1, "author": 1, "price": 1, "_id": 0 }
}

/// Insertion order; ObjectIds from one client increase monotonically.
pub fn insertion_order() -> Document {
    doc! { "_id": 1 }
}

/// Average price and count per genre, highest average first, genre name breaking ties.
pub fn average_price_by_genre() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$genre",
                "avgPrice": { "$avg": "$price" },
                "count": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "avgPrice": -1, "_id": 1 } },
    ]
}

/// Author with the most books. Equal counts resolve to the alphabetically first author.
pub fn most_prolific_author() -> Vec<Document> {
    vec![
        doc! {
            "$group": {
                "_id": "$author",
                "bookCount": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "bookCount": -1, "_id": 1 } },
        doc! { "$limit": 1 },
    ]
}

pub fn books_by_decade() -> Vec<Document> {
    vec![
        doc! {
            "$project": {
                "decade": {
                    "$subtract": [
                        "$published_year",
                        { "$mod": ["$published_year", 10] },
                    ]
                }
            }
        },
        doc! {
            "$group": {
                "_id": "$decade",
                "count": { "$sum": 1 },
            }
        },
        doc! { "$sort": { "_id": 1 } },
    ]
}

/// `explain` command wrapping a find on `collection`.
pub fn explain_find(collection: &str, filter: Document) -> Document {
    doc! {
        "explain": {
            "find": collection,
            "filter": filter,
        },
        "verbosity": "executionStats",
    }
}
