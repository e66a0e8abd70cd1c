//! Storage planning over whole schemas.

use std::collections::HashMap;

use edgepath::path_parser::parse_path;
use edgepath::storage_plan::{Storage, StoragePlan};

use super::blog_schema::blog_schema;

#[test]
fn test_polymorphic_edges_collapse_to_one_pair() {
    let relationships = vec![
        parse_path("posts", "User", "Post", false, "=AUTHORED=>").unwrap(),
        parse_path("comments", "User", "Comment", false, "=AUTHORED=>").unwrap(),
        parse_path("content", "User", "Content", false, "=AUTHORED=>").unwrap(),
    ];
    let polymorphic = HashMap::from([(
        "Content".to_string(),
        vec!["Post".to_string(), "Comment".to_string()],
    )]);

    let plan = StoragePlan::build(&relationships, &polymorphic).unwrap();

    assert_eq!(plan.descriptions().len(), 1);
    assert_eq!(plan.descriptions()[0].pair.right, "Content");
    assert_eq!(plan.collapsed_into("User|AUTHORED|Post"), Some("User|AUTHORED|Content"));
    assert_eq!(plan.collapsed_into("User|AUTHORED|Comment"), Some("User|AUTHORED|Content"));
}

#[test]
fn test_blog_layout() {
    let schema = blog_schema();
    let layout = schema.layout();

    let post_columns: Vec<&str> = layout
        .columns_on("posts")
        .map(|column| column.column.as_str())
        .collect();
    assert_eq!(post_columns, vec!["authored_by_user_id"]);

    assert_eq!(layout.join_tables.len(), 1);
    let follows = &layout.join_tables[0];
    assert_eq!(follows.name, "user_followed_users");
    assert_eq!(follows.left_column.name, "user_id");
    assert_eq!(follows.right_column.name, "followed_user_id");
}

#[test]
fn test_plural_pairs_are_join_tables() {
    let schema = blog_schema();
    let follows = schema
        .storage_plan()
        .description_by_signature("User|FOLLOWED|User")
        .unwrap();

    assert!(matches!(follows.storage, Storage::Join(_)));
    assert!(follows.pair.in_segment.is_some());
    assert!(follows.pair.out_segment.is_some());

    let authored = schema
        .storage_plan()
        .description_by_signature("User|AUTHORED|Post")
        .unwrap();
    match &authored.storage {
        Storage::ForeignKey(fk) => {
            assert_eq!(fk.table, "posts");
            assert_eq!(fk.column, "authored_by_user_id");
        }
        Storage::Join(_) => panic!("expected a foreign key"),
    }
}
