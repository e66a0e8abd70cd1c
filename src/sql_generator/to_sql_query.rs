use crate::query_compiler::{
    ColumnRef, Condition, Join, OrderBy, Query, BATCH_KEY_ALIAS,
};

use super::{RenderOptions, ToSql};

impl ToSql for ColumnRef {
    fn to_sql(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

impl ToSql for Join {
    fn to_sql(&self) -> String {
        let table_expr = match &self.table.alias {
            Some(alias) => format!("{} AS {}", self.table.name, alias),
            None => self.table.name.clone(),
        };

        format!(
            " JOIN {} ON {} = {}",
            table_expr,
            self.condition.left.to_sql(),
            self.condition.right.to_sql()
        )
    }
}

impl ToSql for Condition {
    fn to_sql(&self) -> String {
        match self {
            Condition::AnyOf { column, param } => {
                format!("{} = ANY (${})", column.to_sql(), param)
            }
            Condition::CursorBound {
                column,
                comparison,
                param,
            } => format!(
                "{} {} (SELECT {} FROM {} WHERE id = ${})",
                column.to_sql(),
                comparison.as_str(),
                column.column,
                column.table,
                param
            ),
        }
    }
}

impl ToSql for OrderBy {
    fn to_sql(&self) -> String {
        format!(" ORDER BY {} {}", self.column.to_sql(), self.direction.as_str())
    }
}

/// Everything after the selection list, without the trailing `;`.
fn render_body(query: &Query, options: RenderOptions) -> String {
    let mut sql = format!(" FROM {}", query.table);

    for join in &query.joins {
        sql.push_str(&join.to_sql());
    }

    if !query.conditions.is_empty() {
        let conditions: Vec<String> = query.conditions.iter().map(|c| c.to_sql()).collect();
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    if !options.count {
        if let Some(order) = &query.order {
            sql.push_str(&order.to_sql());
        }
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
    }

    sql
}

pub fn render_query(query: &Query, options: RenderOptions) -> String {
    let selection = if options.count {
        format!("COUNT({}.*)", query.table)
    } else {
        match &query.key_selection {
            Some(key) => format!("{}.*, {} AS {}", query.table, key.to_sql(), BATCH_KEY_ALIAS),
            None => format!("{}.*", query.table),
        }
    };

    let inner = format!("SELECT {}{}", selection, render_body(query, options));

    if options.count || !query.reverse_results {
        return format!("{};", inner);
    }

    match &query.order {
        Some(order) => format!(
            "SELECT * FROM ({}) AS {} ORDER BY {}.{} {};",
            inner,
            query.table,
            query.table,
            order.column.column,
            order.direction.flip().as_str()
        ),
        None => format!("{};", inner),
    }
}
