//! Relationships over a union type: collapsed storage, rendered SQL and the
//! view the layout asks for.

use edgepath::graph_catalog::{Schema, SchemaConfig};

const CONTENT_YAML: &str = r#"
types:
  - name: User
  - name: Post
  - name: Comment
polymorphic_types:
  Content: [Post, Comment]
relationships:
  - type: User
    field: posts
    to: Post
    path: "=AUTHORED=>"
  - type: User
    field: content
    to: Content
    path: "=AUTHORED=>"
  - type: Content
    field: author
    to: User
    path: "<-AUTHORED-"
  - type: Post
    field: author
    to: User
    path: "<-AUTHORED-"
  - type: Comment
    field: author
    to: User
    path: "<-AUTHORED-"
  - type: User
    field: likedPosts
    to: Post
    path: "=LIKED=>"
  - type: User
    field: likedContent
    to: Content
    path: "=LIKED=>"
"#;

fn content_schema() -> Schema {
    Schema::build(&SchemaConfig::from_yaml_str(CONTENT_YAML).unwrap()).unwrap()
}

fn sql(schema: &Schema, type_name: &str, field: &str) -> String {
    schema.resolver(type_name, field).unwrap().batch_sql().to_string()
}

#[test]
fn test_collapsed_relationships_render_on_concrete_tables() {
    let schema = content_schema();

    assert_eq!(
        sql(&schema, "User", "posts"),
        "SELECT posts.* FROM posts WHERE posts.authored_by_user_id = ANY ($1);"
    );
    assert_eq!(
        sql(&schema, "User", "likedPosts"),
        "SELECT posts.* FROM posts \
         JOIN user_liked_contents ON user_liked_contents.liked_content_id = posts.id \
         WHERE user_liked_contents.user_id = ANY ($1);"
    );
    assert_eq!(
        sql(&schema, "Comment", "author"),
        "SELECT users.* FROM users WHERE users.id = ANY ($1);"
    );
}

#[test]
fn test_polymorphic_target_reads_the_declared_view() {
    let schema = content_schema();
    assert_eq!(
        sql(&schema, "User", "content"),
        "SELECT contents.* FROM contents WHERE contents.authored_by_user_id = ANY ($1);"
    );
    assert_eq!(
        sql(&schema, "User", "likedContent"),
        "SELECT contents.* FROM contents \
         JOIN user_liked_contents ON user_liked_contents.liked_content_id = contents.id \
         WHERE user_liked_contents.user_id = ANY ($1);"
    );

    let layout = schema.layout();
    assert_eq!(layout.polymorphic_views.len(), 1);
    let view = &layout.polymorphic_views[0];
    assert_eq!(view.name, "contents");
    assert_eq!(view.members, vec!["posts", "comments"]);
    assert!(view.columns.contains(&"authored_by_user_id".to_string()));

    let key_tables: Vec<&str> = layout
        .foreign_keys
        .iter()
        .map(|fk| fk.table.as_str())
        .collect();
    assert_eq!(key_tables, vec!["posts", "comments"]);
    assert_eq!(layout.join_tables[0].name, "user_liked_contents");
}
