//! Shared blog schema and a recording executor.

use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

use edgepath::graph_catalog::Schema;
use edgepath::loader::{ExecutorError, QueryExecutor, Row};

pub const BLOG_YAML: &str = r#"
name: blog
types:
  - name: User
  - name: Post
    indexed_fields: [createdAt]
  - name: Profile
relationships:
  - type: User
    field: posts
    to: Post
    path: "=AUTHORED=>"
  - type: Post
    field: author
    to: User
    path: "<-AUTHORED-"
  - type: User
    field: following
    to: User
    path: "=FOLLOWED=>"
  - type: User
    field: followers
    to: User
    path: "<=FOLLOWED="
  - type: User
    field: feed
    to: Post
    path: "=FOLLOWED=>User=AUTHORED=>"
  - type: User
    field: profile
    to: Profile
    path: "-OWNS->"
"#;

/// Load the blog schema the way the server does: from a file on disk.
pub fn blog_schema() -> Arc<Schema> {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(BLOG_YAML.as_bytes()).unwrap();
    Arc::new(Schema::from_yaml_file(file.path()).unwrap())
}

pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

/// Answers `users` lookups by id (except `u404`) and everything else with
/// two posts; every call is recorded.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingExecutor {
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, ExecutorError> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));

        if sql.contains("COUNT(") {
            return Ok(vec![row(json!({"count": "4"}))]);
        }
        if sql.starts_with("SELECT users.*") {
            let keys = params[0].as_array().cloned().unwrap_or_default();
            return Ok(keys
                .into_iter()
                .filter(|key| key != "u404")
                .map(|key| row(json!({"id": key.clone(), "handle": key})))
                .collect());
        }
        Ok(vec![
            row(json!({"id": "p1", "authored_by_user_id": "u1"})),
            row(json!({"id": "p2", "authored_by_user_id": "u1"})),
        ])
    }
}
