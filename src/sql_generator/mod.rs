//! Abstract query -> parameterized SQL text.
//!
//! Placeholders are positional: `$1` is always the batch key array and `$2`,
//! when present, the cursor row id.

use crate::query_compiler::Query;

mod to_sql_query;

pub trait ToSql {
    fn to_sql(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Select `COUNT(<table>.*)` instead of rows; drops ordering and limits.
    pub count: bool,
}

impl RenderOptions {
    pub fn rows() -> Self {
        RenderOptions { count: false }
    }

    pub fn count() -> Self {
        RenderOptions { count: true }
    }
}

pub fn render(query: &Query, options: RenderOptions) -> String {
    to_sql_query::render_query(query, options)
}
