//! Request-time resolution: per-request batch queues in front of an injected
//! [`QueryExecutor`].

pub mod batch;
pub mod errors;
pub mod executor;
pub mod resolver;

pub use batch::{Pending, RequestLoaders};
pub use errors::ResolveError;
pub use executor::{ExecutorError, QueryExecutor, Row};
pub use resolver::{FieldValue, RelationshipResolver};
