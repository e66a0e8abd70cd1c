//! Compiled relationships rendered to SQL text.

use edgepath::connection::{ConnectionArgs, ConnectionError};
use edgepath::path_parser::ast::{Cardinality, Direction};
use edgepath::path_parser::parse_path;
use edgepath::sql_generator::{render, RenderOptions};

use super::blog_schema::blog_schema;

#[test]
fn test_three_segment_path_parses() {
    let relationship = parse_path(
        "posts",
        "User",
        "Post",
        false,
        "=FOLLOWED=>User=FOLLOWED=>User=AUTHORED=>",
    )
    .unwrap();

    let shape: Vec<_> = relationship
        .path
        .iter()
        .map(|s| {
            (
                s.from_type.as_str(),
                s.to_type.as_str(),
                s.label.as_str(),
                s.direction,
                s.cardinality,
            )
        })
        .collect();
    assert_eq!(
        shape,
        vec![
            ("User", "User", "FOLLOWED", Direction::Out, Cardinality::Plural),
            ("User", "User", "FOLLOWED", Direction::Out, Cardinality::Plural),
            ("User", "Post", "AUTHORED", Direction::Out, Cardinality::Plural),
        ]
    );
}

#[test]
fn test_posts_renders_single_condition() {
    let schema = blog_schema();
    let posts = schema.resolver("User", "posts").unwrap();

    assert_eq!(
        posts.batch_sql(),
        "SELECT posts.* FROM posts WHERE posts.authored_by_user_id = ANY ($1);"
    );
}

#[test]
fn test_feed_renders_one_join() {
    let schema = blog_schema();
    let feed = schema.resolver("User", "feed").unwrap();

    assert_eq!(
        feed.batch_sql(),
        "SELECT posts.* FROM posts \
         JOIN user_followed_users ON user_followed_users.followed_user_id = posts.authored_by_user_id \
         WHERE user_followed_users.user_id = ANY ($1);"
    );
}

#[test]
fn test_forward_and_backward_pages() {
    let schema = blog_schema();
    let posts = schema.resolver("User", "posts").unwrap();

    let forward = posts
        .connection_query(&ConnectionArgs {
            first: Some(3),
            after: Some("a".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(
        render(&forward.page, RenderOptions::rows()),
        "SELECT posts.* FROM posts WHERE posts.authored_by_user_id = ANY ($1) \
         AND posts.seq > (SELECT seq FROM posts WHERE id = $2) \
         ORDER BY posts.seq ASC LIMIT 3;"
    );

    let backward = posts
        .connection_query(&ConnectionArgs {
            last: Some(3),
            before: Some("z".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(
        render(&backward.page, RenderOptions::rows()),
        "SELECT * FROM (SELECT posts.* FROM posts \
         WHERE posts.authored_by_user_id = ANY ($1) \
         AND posts.seq < (SELECT seq FROM posts WHERE id = $2) \
         ORDER BY posts.seq DESC LIMIT 3) AS posts ORDER BY posts.seq ASC;"
    );
}

#[test]
fn test_order_by_indexed_field() {
    let schema = blog_schema();
    let posts = schema.resolver("User", "posts").unwrap();

    let page = posts
        .connection_query(&ConnectionArgs {
            first: Some(10),
            order: Some("createdAt_DESC".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(
        render(&page.page, RenderOptions::rows()),
        "SELECT posts.* FROM posts WHERE posts.authored_by_user_id = ANY ($1) \
         ORDER BY posts.created_at DESC LIMIT 10;"
    );

    let err = posts
        .connection_query(&ConnectionArgs {
            order: Some("title_ASC".to_string()),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, ConnectionError::UnknownOrderField(_)));
}

#[test]
fn test_first_with_before_is_rejected() {
    let schema = blog_schema();
    let posts = schema.resolver("User", "posts").unwrap();

    let err = posts
        .connection_query(&ConnectionArgs {
            first: Some(3),
            before: Some("z".to_string()),
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err, ConnectionError::ConflictingPagination);
}
