use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::SchemaError;
use crate::storage_plan::PolymorphicTypeMap;

/// Schemas are declared in YAML:
///
/// ```yaml
/// name: blog
/// types:
///   - name: User
///     indexed_fields: [createdAt]
///   - name: Post
///   - name: Comment
/// polymorphic_types:
///   Content: [Post, Comment]
/// relationships:
///   - type: User
///     field: posts
///     to: Post
///     path: "=AUTHORED=>"
///   - type: Post
///     field: author
///     to: User
///     path: "<-AUTHORED-"
///     non_null: true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub types: Vec<TypeDefinition>,
    #[serde(default)]
    pub polymorphic_types: PolymorphicTypeMap,
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    /// Scalar fields backed by an indexed column; connections may order by them.
    #[serde(default)]
    pub indexed_fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipDefinition {
    /// Type the field is declared on.
    #[serde(rename = "type")]
    pub type_name: String,
    pub field: String,
    /// Declared field type; the path's last segment ends here.
    #[serde(rename = "to")]
    pub to_type: String,
    pub path: String,
    #[serde(default)]
    pub non_null: bool,
}

impl SchemaConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|e| SchemaError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(yaml).map_err(|e| SchemaError::ConfigParseError {
            error: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BLOG: &str = r#"
name: blog
types:
  - name: User
    indexed_fields: [createdAt]
  - name: Post
polymorphic_types:
  Content: [Post]
relationships:
  - type: User
    field: posts
    to: Post
    path: "=AUTHORED=>"
  - type: Post
    field: author
    to: User
    path: "<-AUTHORED-"
    non_null: true
"#;

    #[test]
    fn test_parse_yaml() {
        let config = SchemaConfig::from_yaml_str(BLOG).unwrap();

        assert_eq!(config.name.as_deref(), Some("blog"));
        assert_eq!(config.types.len(), 2);
        assert_eq!(config.types[0].indexed_fields, vec!["createdAt"]);
        assert!(config.types[1].indexed_fields.is_empty());
        assert_eq!(config.polymorphic_types["Content"], vec!["Post"]);
        assert_eq!(config.relationships[0].type_name, "User");
        assert_eq!(config.relationships[0].to_type, "Post");
        assert!(!config.relationships[0].non_null);
        assert!(config.relationships[1].non_null);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(BLOG.as_bytes()).unwrap();

        let config = SchemaConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.relationships.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = SchemaConfig::from_yaml_file("/nonexistent/schema.yaml").unwrap_err();
        assert!(matches!(err, SchemaError::ConfigReadError { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = SchemaConfig::from_yaml_str("types: [").unwrap_err();
        assert!(matches!(err, SchemaError::ConfigParseError { .. }));
    }
}
