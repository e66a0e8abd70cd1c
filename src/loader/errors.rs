use thiserror::Error;

use crate::connection::ConnectionError;

use super::executor::ExecutorError;

/// Field-scoped resolution failure. Siblings of the failing field still resolve.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidArguments(#[from] ConnectionError),

    #[error("Query execution failed: {0}")]
    Execution(String),

    #[error("No relationship `{field}` on type `{type_name}`")]
    UnknownRelationship { type_name: String, field: String },

    #[error("Batch was dropped before it completed")]
    Cancelled,
}

impl ResolveError {
    pub fn execution(error: ExecutorError) -> Self {
        ResolveError::Execution(error.to_string())
    }

    pub fn unknown_relationship(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        ResolveError::UnknownRelationship {
            type_name: type_name.into(),
            field: field.into(),
        }
    }
}
