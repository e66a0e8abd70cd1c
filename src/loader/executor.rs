use async_trait::async_trait;
use serde_json::Value;

/// One result row, column name -> value, in select order.
pub type Row = serde_json::Map<String, Value>;

pub type ExecutorError = Box<dyn std::error::Error + Send + Sync>;

/// The database driver seen from the loaders.
///
/// `params[0]` is always the batch key array; `params[1]`, when present, is
/// the cursor row id. Pooling and connection lifetimes are the implementor's
/// concern.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, ExecutorError>;
}
