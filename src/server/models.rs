use serde::{Deserialize, Serialize};

use crate::connection::ConnectionArgs;

/// Body of `POST /query/sql`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqlGenerationRequest {
    /// Type declaring the relationship field
    #[serde(rename = "type")]
    pub type_name: String,
    pub field: String,
    /// Connection arguments (plural relationships only)
    #[serde(default)]
    pub args: ConnectionArgs,
    /// Also render the count queries used for totalCount / pageInfo
    #[serde(default)]
    pub count: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SqlGenerationResponse {
    pub relationship: String,
    pub plural: bool,
    /// Column of the source object bound (as an array) to `$1`
    pub object_key_column: String,
    pub sql: String,
    /// `COUNT` over every row for the key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count_sql: Option<String>,
    /// `COUNT` over the rows past the cursor; only with a cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constrained_count_sql: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SqlGenerationError {
    pub error: String,
    pub error_type: String,
}

impl SqlGenerationError {
    pub fn new(error: impl ToString, error_type: &str) -> Self {
        SqlGenerationError {
            error: error.to_string(),
            error_type: error_type.to_string(),
        }
    }
}
