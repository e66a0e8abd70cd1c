//! Join compaction.
//!
//! Walking a path hop by hop joins every intermediate table, even when the next
//! hop only needs that table's `id`, which is already available on the previous
//! join's right-hand column:
//!
//! ```text
//! JOIN users ON users.id = posts.authored_by_user_id
//! JOIN user_followed_users ON user_followed_users.followed_user_id = users.id
//! ```
//!
//! collapses to
//!
//! ```text
//! JOIN user_followed_users ON user_followed_users.followed_user_id = posts.authored_by_user_id
//! ```

use super::types::{Join, JoinCondition};

/// Merge each join whose left reference equals the next join's right reference.
///
/// The merged join keeps the later table and reads the earlier right column
/// directly. The same index is re-checked after a merge so runs of redundant
/// joins fold completely.
pub fn compact_joins(joins: Vec<Join>) -> Vec<Join> {
    let mut joins = joins;
    let mut idx = 0;

    while idx + 1 < joins.len() {
        if joins[idx].condition.left == joins[idx + 1].condition.right {
            let skipped = joins.remove(idx);
            let next = &mut joins[idx];
            log::debug!(
                "Compacting join on {} into {}",
                skipped.table.reference(),
                next.table.reference()
            );
            next.condition = JoinCondition {
                left: next.condition.left.clone(),
                right: skipped.condition.right,
            };
        } else {
            idx += 1;
        }
    }

    joins
}
