use serde::{Deserialize, Serialize};

use crate::graph_catalog::errors::SchemaError;
use crate::graph_catalog::naming::{
    foreign_key_column_name, join_left_column_name, join_right_column_name, join_table_name,
    table_name,
};
use crate::path_parser::ast::{Direction, Segment};

use super::pairing::SegmentPair;

/// A column on `table` (the table of `owning_type`) pointing at `referenced_table`.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct ForeignKeyStorage {
    /// Direction of the segment the key was planned from.
    pub direction: Direction,
    pub table: String,
    pub referenced_table: String,
    pub column: String,
    pub non_null: bool,
    pub owning_type: String,
    pub referenced_type: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct JoinStorage {
    pub name: String,
    pub left_table_name: String,
    pub right_table_name: String,
    pub left_column_name: String,
    pub right_column_name: String,
    pub left_type: String,
    pub right_type: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Storage {
    ForeignKey(ForeignKeyStorage),
    Join(JoinStorage),
}

/// How one (possibly polymorphic) pair is stored.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct SegmentDescription {
    pub pair: SegmentPair,
    pub storage: Storage,
}

/// Side of a non-join pair that owns the foreign key.
///
/// The `in` side wins when `out` is undeclared, when `in` is plural, or when
/// only `out` is non-null. Two singular sides with no non-null marker settle
/// on `out`.
fn normal_side(pair: &SegmentPair) -> Result<&Segment, SchemaError> {
    match (&pair.in_segment, &pair.out_segment) {
        (Some(in_segment), None) => Ok(in_segment),
        (None, Some(out_segment)) => Ok(out_segment),
        (Some(in_segment), Some(out_segment)) => {
            if in_segment.cardinality.is_plural()
                || (out_segment.non_null && !in_segment.non_null)
            {
                Ok(in_segment)
            } else {
                Ok(out_segment)
            }
        }
        (None, None) => Err(SchemaError::EmptySegmentPair),
    }
}

pub fn plan_storage(pair: &SegmentPair) -> Result<SegmentDescription, SchemaError> {
    let side_allows_join =
        |side: &Option<Segment>| side.as_ref().is_none_or(|s| s.cardinality.is_plural());
    let is_join = side_allows_join(&pair.in_segment) && side_allows_join(&pair.out_segment);

    let storage = if is_join {
        Storage::Join(JoinStorage {
            name: join_table_name(&pair.left, &pair.label, &pair.right),
            left_table_name: table_name(&pair.left),
            right_table_name: table_name(&pair.right),
            left_column_name: join_left_column_name(&pair.left),
            right_column_name: join_right_column_name(&pair.label, &pair.right),
            left_type: pair.left.clone(),
            right_type: pair.right.clone(),
        })
    } else {
        let normal = normal_side(pair)?;
        let non_null = pair.in_segment.as_ref().is_some_and(|s| s.non_null)
            || pair.out_segment.as_ref().is_some_and(|s| s.non_null);

        Storage::ForeignKey(ForeignKeyStorage {
            direction: normal.direction,
            table: table_name(&normal.to_type),
            referenced_table: table_name(&normal.from_type),
            column: foreign_key_column_name(&pair.label, &normal.from_type, normal.direction),
            non_null,
            owning_type: normal.to_type.clone(),
            referenced_type: normal.from_type.clone(),
        })
    };

    Ok(SegmentDescription {
        pair: pair.clone(),
        storage,
    })
}
