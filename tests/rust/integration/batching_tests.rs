//! Request-scoped batching through the public loader API.

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::{json, Value};

use edgepath::connection::{ConnectionArgs, ConnectionError, ConnectionSelection};
use edgepath::loader::{FieldValue, RequestLoaders, ResolveError};

use super::blog_schema::{blog_schema, row, RecordingExecutor};

fn handle(value: FieldValue) -> Option<String> {
    match value {
        FieldValue::Object(found) => found.map(|r| r["handle"].as_str().unwrap().to_string()),
        FieldValue::Connection(_) => panic!("expected an object"),
    }
}

#[tokio::test]
async fn test_one_tick_of_singular_lookups_is_one_query() {
    let executor = Arc::new(RecordingExecutor::default());
    let loaders = RequestLoaders::new(blog_schema(), executor.clone());

    let keys = ["u3", "u1", "u404", "u3", "u2"];
    let lookups: Vec<_> = keys
        .iter()
        .map(|key| {
            loaders.resolve(
                "Post",
                "author",
                &row(json!({"id": "p", "authored_by_user_id": key})),
                ConnectionArgs::default(),
                ConnectionSelection::default(),
            )
        })
        .collect();
    loaders.flush().await;

    let handles: Vec<Option<String>> = join_all(lookups)
        .await
        .into_iter()
        .map(|result| handle(result.unwrap()))
        .collect();
    assert_eq!(
        handles,
        vec![
            Some("u3".to_string()),
            Some("u1".to_string()),
            None,
            Some("u3".to_string()),
            Some("u2".to_string()),
        ]
    );

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, vec![json!(["u3", "u1", "u404", "u2"])]);
}

#[tokio::test]
async fn test_connection_with_counts() {
    let executor = Arc::new(RecordingExecutor::default());
    let loaders = RequestLoaders::new(blog_schema(), executor.clone());

    let feed = loaders.resolve(
        "User",
        "feed",
        &row(json!({"id": "u1"})),
        ConnectionArgs {
            first: Some(2),
            ..Default::default()
        },
        ConnectionSelection {
            total_count: true,
            page_info: true,
        },
    );
    loaders.flush().await;

    let connection = match feed.await.unwrap() {
        FieldValue::Connection(connection) => connection,
        FieldValue::Object(_) => panic!("expected a connection"),
    };
    assert_eq!(connection.total_count, Some(4));
    assert_eq!(
        connection
            .edges
            .iter()
            .map(|edge| edge.cursor.as_str())
            .collect::<Vec<_>>(),
        vec!["p1", "p2"]
    );
    assert!(connection.page_info.unwrap().has_next_page);

    // Page plus total count; no cursor means no constrained count.
    let calls = executor.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].0.ends_with("ORDER BY posts.seq ASC LIMIT 2;"));
    assert!(calls[1].0.starts_with("SELECT COUNT(posts.*) FROM posts JOIN user_followed_users"));
}

#[tokio::test]
async fn test_invalid_arguments_do_not_affect_siblings() {
    let executor = Arc::new(RecordingExecutor::default());
    let loaders = RequestLoaders::new(blog_schema(), executor.clone());
    let user = row(json!({"id": "u1"}));

    let invalid = loaders.resolve(
        "User",
        "posts",
        &user,
        ConnectionArgs {
            first: Some(1),
            before: Some("p9".to_string()),
            ..Default::default()
        },
        ConnectionSelection::default(),
    );
    let valid = loaders.resolve(
        "User",
        "posts",
        &user,
        ConnectionArgs::default(),
        ConnectionSelection::default(),
    );
    loaders.flush().await;

    assert_eq!(
        invalid.await.unwrap_err(),
        ResolveError::InvalidArguments(ConnectionError::ConflictingPagination)
    );
    assert!(matches!(valid.await.unwrap(), FieldValue::Connection(_)));
    assert_eq!(executor.calls().len(), 1);
}

#[tokio::test]
async fn test_missing_key_resolves_to_nothing() {
    let executor = Arc::new(RecordingExecutor::default());
    let loaders = RequestLoaders::new(blog_schema(), executor.clone());

    let author = loaders.resolve(
        "Post",
        "author",
        &row(json!({"id": "p"})),
        ConnectionArgs::default(),
        ConnectionSelection::default(),
    );
    let posts = loaders.resolve(
        "User",
        "posts",
        &row(json!({"id": Value::Null})),
        ConnectionArgs::default(),
        ConnectionSelection {
            total_count: true,
            page_info: false,
        },
    );
    loaders.flush().await;

    assert_eq!(author.await.unwrap(), FieldValue::Object(None));
    match posts.await.unwrap() {
        FieldValue::Connection(connection) => assert!(connection.edges.is_empty()),
        FieldValue::Object(_) => panic!("expected a connection"),
    }
    assert!(executor.calls().is_empty());
}
