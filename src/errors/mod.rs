use thiserror::Error;

/// Failure of a single store operation.
///
/// Callers see one category: the operation failed and the remaining battery
/// is abandoned. The variants only distinguish what to print.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("{operation} failed: {source}")]
    OperationFailed {
        operation: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("{operation} returned an unexpected result: {details}")]
    UnexpectedResult {
        operation: &'static str,
        details: String,
    },
}

impl QueryError {
    /// Name of the operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            QueryError::OperationFailed { operation, .. } => operation,
            QueryError::UnexpectedResult { operation, .. } => operation,
        }
    }

    pub fn unexpected(operation: &'static str, details: impl Into<String>) -> Self {
        QueryError::UnexpectedResult {
            operation,
            details: details.into(),
        }
    }
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Tags driver errors with the operation that produced them.
pub trait OperationExt<T> {
    fn during(self, operation: &'static str) -> QueryResult<T>;
}

impl<T> OperationExt<T> for mongodb::error::Result<T> {
    fn during(self, operation: &'static str) -> QueryResult<T> {
        self.map_err(|source| QueryError::OperationFailed { operation, source })
    }
}

impl<T> OperationExt<T> for mongodb::bson::de::Result<T> {
    fn during(self, operation: &'static str) -> QueryResult<T> {
        self.map_err(|e| QueryError::unexpected(operation, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    #[test]
    fn test_unexpected_result_message_names_operation() {
        let err = QueryError::unexpected("explain find", "missing executionStats");
        assert_eq!(err.operation(), "explain find");
        assert_eq!(
            err.to_string(),
            "explain find returned an unexpected result: missing executionStats"
        );
    }

    #[test]
    fn test_decode_failure_maps_to_unexpected_result() {
        let result: QueryResult<i32> =
            from_document::<i32>(doc! { "not": "a number" }).during("decode count");
        match result {
            Err(QueryError::UnexpectedResult { operation, .. }) => {
                assert_eq!(operation, "decode count")
            }
            other => panic!("expected UnexpectedResult, got {:?}", other),
        }
    }
}
