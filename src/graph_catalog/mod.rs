pub mod config;
pub mod errors;
pub mod graph_schema;
pub mod naming;
pub mod type_registry;

pub use config::{RelationshipDefinition, SchemaConfig, TypeDefinition};
pub use errors::SchemaError;
pub use graph_schema::Schema;
pub use type_registry::{TypeEntry, TypeId, TypeKind, TypeRegistry};
