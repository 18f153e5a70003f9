use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    /// A catalog operation failed. `message` is what the caller sees,
    /// `source` is only ever logged.
    #[error("{message}: {source}")]
    Operation {
        message: &'static str,
        #[source]
        source: Box<AppError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Attach the caller-facing failure message of an operation.
    ///
    /// Invalid input passes through untouched so the client still gets the
    /// specific reason.
    pub fn in_operation(self, message: &'static str) -> Self {
        match self {
            AppError::BadRequest(_) | AppError::Operation { .. } => self,
            other => AppError::Operation {
                message,
                source: Box::new(other),
            },
        }
    }
}

impl From<::config::ConfigError> for AppError {
    fn from(err: ::config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_operation_wraps_database_errors() {
        let err = AppError::Database("connection reset".into()).in_operation("Error fetching brands");
        match err {
            AppError::Operation { message, source } => {
                assert_eq!(message, "Error fetching brands");
                assert!(source.to_string().contains("connection reset"));
            }
            other => panic!("Expected Operation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_in_operation_keeps_bad_request() {
        let err = AppError::BadRequest("nope".into()).in_operation("Error performing search");
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "nope"));
    }

    #[test]
    fn test_in_operation_does_not_nest() {
        let err = AppError::Database("boom".into())
            .in_operation("Error performing search")
            .in_operation("Error fetching items");
        match err {
            AppError::Operation { message, .. } => assert_eq!(message, "Error performing search"),
            other => panic!("Expected Operation error, got: {:?}", other),
        }
    }
}
