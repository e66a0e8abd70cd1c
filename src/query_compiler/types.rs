use serde::{Deserialize, Serialize};

/// One occurrence of a table in a query.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    /// Set when the table already appears earlier in the same query.
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        TableRef {
            name: name.into(),
            alias: None,
        }
    }

    /// Name other clauses use to refer to this occurrence.
    pub fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn column(&self, column: impl Into<String>) -> ColumnRef {
        ColumnRef {
            table: self.reference().to_string(),
            column: column.into(),
        }
    }
}

/// `table.column`, where `table` is a table name or alias.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct JoinCondition {
    /// Column on the joined table.
    pub left: ColumnRef,
    /// Column on a table joined earlier (or the base table).
    pub right: ColumnRef,
}

/// Inner join: a row without the related row is not part of the relationship.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Join {
    pub table: TableRef,
    pub condition: JoinCondition,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Comparison {
    Greater,
    Less,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Greater => ">",
            Comparison::Less => "<",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum Condition {
    /// `column = ANY ($param)`
    AnyOf { column: ColumnRef, param: usize },
    /// `column > (SELECT column FROM table WHERE id = $param)`
    CursorBound {
        column: ColumnRef,
        comparison: Comparison,
        param: usize,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn flip(self) -> Self {
        match self {
            OrderDirection::Asc => OrderDirection::Desc,
            OrderDirection::Desc => OrderDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub direction: OrderDirection,
}

/// Abstract query over one base table. Cheap to clone; built per resolution.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Query {
    pub table: String,
    pub joins: Vec<Join>,
    pub conditions: Vec<Condition>,
    pub order: Option<OrderBy>,
    pub limit: Option<u64>,
    /// Re-sort a backward page into forward order on the way out.
    pub reverse_results: bool,
    /// Extra column selected as `__batch_key` so rows can be re-keyed when the
    /// batch key does not live on the base table.
    pub key_selection: Option<ColumnRef>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Query {
            table: table.into(),
            joins: Vec::new(),
            conditions: Vec::new(),
            order: None,
            limit: None,
            reverse_results: false,
            key_selection: None,
        }
    }

    pub fn base(&self) -> TableRef {
        TableRef::new(self.table.clone())
    }

    /// Number of `$n` placeholders the conditions use.
    pub fn param_count(&self) -> usize {
        self.conditions
            .iter()
            .map(|c| match c {
                Condition::AnyOf { param, .. } | Condition::CursorBound { param, .. } => *param,
            })
            .max()
            .unwrap_or(0)
    }
}
