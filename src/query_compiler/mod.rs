//! Relationship -> abstract query compilation.

pub mod compiler;
pub mod join_compaction;
pub mod types;

pub use compiler::{compile, CompiledRelationship, BATCH_KEY_ALIAS};
pub use types::{
    ColumnRef, Comparison, Condition, Join, JoinCondition, OrderBy, OrderDirection,
    Query, TableRef,
};
