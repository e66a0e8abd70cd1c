use std::collections::HashMap;

use serde::Serialize;

use crate::graph_catalog::errors::SchemaError;
use crate::graph_catalog::naming::table_name;
use crate::path_parser::ast::{Direction, Relationship};
use crate::storage_plan::{JoinStorage, Storage, StoragePlan};

use super::join_compaction::compact_joins;
use super::types::{ColumnRef, Condition, Join, JoinCondition, Query, TableRef};

/// Alias under which the batch key is selected when it is not a base-table column.
pub const BATCH_KEY_ALIAS: &str = "__batch_key";

/// A relationship compiled once at schema load.
#[derive(Debug, Clone, Serialize)]
pub struct CompiledRelationship {
    pub relationship: Relationship,
    /// Template query; connection arguments are layered on a clone of it.
    pub query: Query,
    /// Column of the source object whose value is the batch key.
    pub object_key_column: String,
    /// Column the `ANY ($1)` condition tests; result rows are re-keyed by it.
    pub resolved_key: ColumnRef,
}

impl CompiledRelationship {
    /// Row field holding the batch key in this relationship's result rows.
    pub fn resolved_key_field(&self) -> &str {
        if self.query.key_selection.is_some() {
            BATCH_KEY_ALIAS
        } else {
            &self.resolved_key.column
        }
    }
}

/// Hands out table occurrences, aliasing repeats as `{table}_{n}`.
#[derive(Default)]
struct TableAllocator {
    seen: HashMap<String, usize>,
}

impl TableAllocator {
    fn allocate(&mut self, name: &str) -> TableRef {
        let count = self.seen.entry(name.to_string()).or_insert(0);
        let table = if *count == 0 {
            TableRef::new(name)
        } else {
            TableRef {
                name: name.to_string(),
                alias: Some(format!("{}_{}", name, count)),
            }
        };
        *count += 1;
        table
    }
}

fn inner_join(table: &TableRef, left: ColumnRef, right: ColumnRef) -> Join {
    Join {
        table: table.clone(),
        condition: JoinCondition { left, right },
    }
}

/// `(near, far)` join-table columns for a segment walked from its `to` end.
fn join_columns(storage: &JoinStorage, direction: Direction) -> (&str, &str) {
    match direction {
        Direction::Out => (&storage.right_column_name, &storage.left_column_name),
        Direction::In => (&storage.left_column_name, &storage.right_column_name),
    }
}

/// Compile `relationship` into a base query selecting its target rows for a
/// batch of source keys bound as `$1`.
///
/// The query starts at the final segment's target table and walks the path
/// backwards, so each join only references tables already in scope. The
/// initial segment contributes the `ANY ($1)` condition.
pub fn compile(
    relationship: &Relationship,
    plan: &StoragePlan,
) -> Result<CompiledRelationship, SchemaError> {
    let mut tables = TableAllocator::default();
    let base = tables.allocate(&table_name(&relationship.final_segment().to_type));
    let mut query = Query::new(base.name.clone());
    let mut joins = Vec::new();
    let mut head = base;

    for segment in relationship.path[1..].iter().rev() {
        let description = plan.description_for(segment)?;
        head = match &description.storage {
            Storage::ForeignKey(fk) if fk.direction == segment.direction => {
                let referenced = tables.allocate(&table_name(&segment.from_type));
                joins.push(inner_join(
                    &referenced,
                    referenced.column("id"),
                    head.column(&fk.column),
                ));
                referenced
            }
            Storage::ForeignKey(fk) => {
                let owning = tables.allocate(&table_name(&segment.from_type));
                joins.push(inner_join(
                    &owning,
                    owning.column(&fk.column),
                    head.column("id"),
                ));
                owning
            }
            Storage::Join(storage) => {
                let (near, far) = join_columns(storage, segment.direction);
                let join_table = tables.allocate(&storage.name);
                joins.push(inner_join(
                    &join_table,
                    join_table.column(near),
                    head.column("id"),
                ));
                let far_table = tables.allocate(&table_name(&segment.from_type));
                joins.push(inner_join(
                    &far_table,
                    far_table.column("id"),
                    join_table.column(far),
                ));
                far_table
            }
        };
    }

    let initial = relationship.initial_segment();
    let (resolved_key, object_key_column) = match &plan.description_for(initial)?.storage {
        Storage::ForeignKey(fk) if fk.direction == initial.direction => {
            (head.column(&fk.column), "id".to_string())
        }
        Storage::ForeignKey(fk) => (head.column("id"), fk.column.clone()),
        Storage::Join(storage) => {
            let (near, far) = join_columns(storage, initial.direction);
            let join_table = tables.allocate(&storage.name);
            joins.push(inner_join(
                &join_table,
                join_table.column(near),
                head.column("id"),
            ));
            (join_table.column(far), "id".to_string())
        }
    };

    query.joins = compact_joins(joins);
    query.conditions.push(Condition::AnyOf {
        column: resolved_key.clone(),
        param: 1,
    });
    if !relationship.is_plural() && resolved_key.table != query.table {
        query.key_selection = Some(resolved_key.clone());
    }

    log::debug!(
        "Compiled {}: {} joins, key {}.{} (object key {})",
        relationship.qualified_name(),
        query.joins.len(),
        resolved_key.table,
        resolved_key.column,
        object_key_column
    );

    Ok(CompiledRelationship {
        relationship: relationship.clone(),
        query,
        object_key_column,
        resolved_key,
    })
}
