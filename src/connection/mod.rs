//! Relay-style cursor pagination layered on a compiled relationship query.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph_catalog::naming::column_name;
use crate::loader::Row;
use crate::query_compiler::{Comparison, Condition, OrderBy, OrderDirection, Query};

pub mod errors;

pub use errors::ConnectionError;

/// Insertion sequence column every table carries; the default sort key.
pub const SEQUENCE_FIELD: &str = "seq";

lazy_static! {
    static ref ORDER_ARGUMENT: Regex =
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*?)_(ASC|DESC)$").expect("order pattern is valid");
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionArgs {
    pub first: Option<u64>,
    pub after: Option<String>,
    pub last: Option<u64>,
    pub before: Option<String>,
    /// `<field>_ASC` or `<field>_DESC`.
    pub order: Option<String>,
}

impl ConnectionArgs {
    fn is_forward(&self) -> bool {
        self.first.is_some() || self.after.is_some()
    }

    fn is_backward(&self) -> bool {
        self.last.is_some() || self.before.is_some()
    }
}

/// Which connection fields the caller selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSelection {
    pub total_count: bool,
    pub page_info: bool,
}

impl ConnectionSelection {
    pub fn needs_count(&self) -> bool {
        self.total_count || self.page_info
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    Forward { first: Option<u64> },
    Backward { last: Option<u64> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub node: Row,
    pub cursor: String,
}

impl Edge {
    /// Wrap a row; its `id` is the cursor.
    pub fn from_row(node: Row) -> Self {
        let cursor = match node.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Edge { node, cursor }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub edges: Vec<Edge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

/// A page query plus what is needed to count around it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionQuery {
    pub page: Query,
    /// Cursor row id, bound as `$2`.
    pub cursor: Option<String>,
    pub paging: Paging,
}

impl ConnectionQuery {
    /// Count query over the same rows as the page, without ordering or limit.
    /// With `constrained == false` the cursor condition is dropped too.
    pub fn count_query(&self, constrained: bool) -> Query {
        let mut query = self.page.clone();
        query.order = None;
        query.limit = None;
        query.reverse_results = false;
        query.key_selection = None;
        if !constrained {
            query
                .conditions
                .retain(|c| !matches!(c, Condition::CursorBound { .. }));
        }
        query
    }

    pub fn has_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    /// `total` counts every row for the key; `constrained` only those past the
    /// cursor. Without a cursor both are the same count.
    pub fn page_info(&self, total: u64, constrained: u64, edges: &[Edge]) -> PageInfo {
        let (has_next_page, has_previous_page) = match self.paging {
            Paging::Forward { first } => (
                first.is_some_and(|first| constrained > first),
                total > constrained,
            ),
            Paging::Backward { last } => (
                total > constrained,
                last.is_some_and(|last| constrained > last),
            ),
        };

        PageInfo {
            has_next_page,
            has_previous_page,
            start_cursor: edges.first().map(|e| e.cursor.clone()),
            end_cursor: edges.last().map(|e| e.cursor.clone()),
        }
    }
}

fn parse_order(
    order: Option<&str>,
    indexed_fields: &[String],
) -> Result<(String, OrderDirection), ConnectionError> {
    let Some(order) = order else {
        return Ok((SEQUENCE_FIELD.to_string(), OrderDirection::Asc));
    };

    let captures = ORDER_ARGUMENT
        .captures(order)
        .ok_or_else(|| ConnectionError::InvalidOrder(order.to_string()))?;
    let field = &captures[1];
    let direction = match &captures[2] {
        "DESC" => OrderDirection::Desc,
        _ => OrderDirection::Asc,
    };

    if field != SEQUENCE_FIELD && !indexed_fields.iter().any(|f| f == field) {
        return Err(ConnectionError::UnknownOrderField(field.to_string()));
    }

    Ok((column_name(field), direction))
}

/// Layer `args` onto a copy of `query`.
///
/// Forward paging scans in the requested order from the cursor; backward
/// paging scans the opposite way and marks the query for re-sorting so edges
/// always come back in the requested order.
pub fn apply_connection_args(
    query: &Query,
    args: &ConnectionArgs,
    indexed_fields: &[String],
) -> Result<ConnectionQuery, ConnectionError> {
    if args.is_forward() && args.is_backward() {
        return Err(ConnectionError::ConflictingPagination);
    }

    let (column, direction) = parse_order(args.order.as_deref(), indexed_fields)?;
    let order_column = query.base().column(column);
    let mut page = query.clone();

    let (paging, cursor, scan, comparison) = if args.is_backward() {
        (
            Paging::Backward { last: args.last },
            args.before.clone(),
            direction.flip(),
            match direction {
                OrderDirection::Asc => Comparison::Less,
                OrderDirection::Desc => Comparison::Greater,
            },
        )
    } else {
        (
            Paging::Forward { first: args.first },
            args.after.clone(),
            direction,
            match direction {
                OrderDirection::Asc => Comparison::Greater,
                OrderDirection::Desc => Comparison::Less,
            },
        )
    };

    if cursor.is_some() {
        page.conditions.push(Condition::CursorBound {
            column: order_column.clone(),
            comparison,
            param: 2,
        });
    }
    page.order = Some(OrderBy {
        column: order_column,
        direction: scan,
    });
    page.limit = match paging {
        Paging::Forward { first } => first,
        Paging::Backward { last } => last,
    };
    page.reverse_results = matches!(paging, Paging::Backward { .. });

    Ok(ConnectionQuery {
        page,
        cursor,
        paging,
    })
}
