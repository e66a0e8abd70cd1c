//! # Schema Error Types
//!
//! Every error raised while a schema is being built: reading and parsing the
//! schema file, parsing relationship paths, pairing and planning storage, and
//! compiling the per-relationship query templates.
//!
//! All of these are fatal at startup. A schema that builds successfully never
//! produces one of these at request time.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("Malformed path `{path}` on field `{field}`: {reason}")]
    MalformedPath {
        field: String,
        path: String,
        reason: String,
    },
    #[error("Unrecognized arrow `{token}` in path of field `{field}` (expected -->, <--, ==> or <==)")]
    UnrecognizedArrow { field: String, token: String },
    #[error("Non-null field `{field}` must have a single singular path segment")]
    InvalidNonNullPath { field: String },
    #[error("Segment pair `{signature}` has conflicting labels `{in_label}` and `{out_label}`")]
    PairLabelMismatch {
        signature: String,
        in_label: String,
        out_label: String,
    },
    #[error("Segment pair has neither an in nor an out side")]
    EmptySegmentPair,
    #[error("No storage description for segment `{signature}`")]
    MissingDescription { signature: String },
    #[error("Unknown type `{name}` referenced by {context}")]
    UnknownType { name: String, context: String },
    #[error("Type `{name}` is declared more than once")]
    DuplicateType { name: String },
    #[error("Field `{field}` is declared more than once on type `{type_name}`")]
    DuplicateField { type_name: String, field: String },
    #[error("Failed to read schema file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse schema file: {error}")]
    ConfigParseError { error: String },
}

impl SchemaError {
    pub fn malformed_path(
        field: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SchemaError::MalformedPath {
            field: field.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownType error naming where the reference came from
    ///
    /// # Example
    /// ```ignore
    /// SchemaError::unknown_type("Psot", "relationship User.posts")
    /// ```
    pub fn unknown_type(name: impl Into<String>, context: impl Into<String>) -> Self {
        SchemaError::UnknownType {
            name: name.into(),
            context: context.into(),
        }
    }
}
