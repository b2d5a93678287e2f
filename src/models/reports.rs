use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};

/// Row of the average-price-by-genre aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenrePriceStats {
    #[serde(rename = "_id")]
    pub genre: String,
    #[serde(rename = "avgPrice")]
    pub avg_price: f64,
    pub count: i64,
}

/// Row of the most-prolific-author aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorBookCount {
    #[serde(rename = "_id")]
    pub author: String,
    #[serde(rename = "bookCount")]
    pub book_count: i64,
}

/// Row of the books-by-decade aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecadeCount {
    #[serde(rename = "_id")]
    pub decade: i32,
    pub count: i64,
}

impl DecadeCount {
    pub fn label(&self) -> String {
        format!("{}s", self.decade)
    }
}

/// Decade bucket key for a publication year, matching `year - year % 10` on the server.
pub fn decade_of(year: i32) -> i32 {
    year - year % 10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    /// Sort specification on `field`, with `_id` as the tie-break in the same direction.
    pub fn sort_by(self, field: &str) -> Document {
        let direction = self.as_i32();
        doc! { field: direction, "_id": direction }
    }
}

/// Offset/limit window over a read, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// A zero-sized page selects nothing. The server reads `limit(0)` as unlimited.
    pub fn is_empty(&self) -> bool {
        self.per_page == 0
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

/// Counters from an `executionStats` explain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionStats {
    pub n_returned: u64,
    pub total_keys_examined: u64,
    pub total_docs_examined: u64,
    pub execution_time_millis: u64,
    pub index_used: bool,
}

impl ExecutionStats {
    /// Pull the counters out of an explain response. `None` if `executionStats` is absent.
    pub fn from_explain(explain: &Document) -> Option<Self> {
        let stats = explain.get_document("executionStats").ok()?;

        Some(Self {
            n_returned: read_count(stats, "nReturned")?,
            total_keys_examined: read_count(stats, "totalKeysExamined").unwrap_or(0),
            total_docs_examined: read_count(stats, "totalDocsExamined")?,
            execution_time_millis: read_count(stats, "executionTimeMillis").unwrap_or(0),
            index_used: explain
                .get_document("queryPlanner")
                .ok()
                .and_then(|planner| planner.get("winningPlan"))
                .map(contains_index_scan)
                .unwrap_or(false),
        })
    }
}

// Servers report counters as int32, int64 or double depending on version.
fn read_count(document: &Document, key: &str) -> Option<u64> {
    match document.get(key)? {
        Bson::Int32(v) => u64::try_from(*v).ok(),
        Bson::Int64(v) => u64::try_from(*v).ok(),
        Bson::Double(v) if *v >= 0.0 => Some(*v as u64),
        _ => None,
    }
}

// Plan trees nest through inputStage/inputStages and, on newer servers, queryPlan.
fn contains_index_scan(plan: &Bson) -> bool {
    match plan {
        Bson::Document(stage) => stage.iter().any(|(key, value)| match value {
            Bson::String(name) if key == "stage" => name.contains("IXSCAN"),
            other => contains_index_scan(other),
        }),
        Bson::Array(stages) => stages.iter().any(contains_index_scan),
        _ => false,
    }
}
