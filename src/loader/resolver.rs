use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::connection::{
    apply_connection_args, Connection, ConnectionArgs, ConnectionError, ConnectionQuery,
    ConnectionSelection,
};
use crate::path_parser::ast::Relationship;
use crate::query_compiler::CompiledRelationship;
use crate::sql_generator::{render, RenderOptions};

use super::batch::{Pending, RequestLoaders};
use super::errors::ResolveError;
use super::executor::Row;

/// Resolved value of one relationship field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Singular relationship: the related row, or `null`.
    Object(Option<Row>),
    /// Plural relationship.
    Connection(Connection),
}

/// Resolver for one relationship field, built once with the schema.
#[derive(Debug, Clone)]
pub struct RelationshipResolver {
    compiled: CompiledRelationship,
    /// Indexed fields of the target type, usable in `order`.
    indexed_fields: Vec<String>,
    batch_sql: String,
}

impl RelationshipResolver {
    pub fn new(compiled: CompiledRelationship, indexed_fields: Vec<String>) -> Self {
        let batch_sql = render(&compiled.query, RenderOptions::rows());
        RelationshipResolver {
            compiled,
            indexed_fields,
            batch_sql,
        }
    }

    pub fn relationship(&self) -> &Relationship {
        &self.compiled.relationship
    }

    pub fn compiled(&self) -> &CompiledRelationship {
        &self.compiled
    }

    pub fn qualified_name(&self) -> String {
        self.compiled.relationship.qualified_name()
    }

    pub fn is_plural(&self) -> bool {
        self.compiled.relationship.is_plural()
    }

    /// SQL for one batch of singular lookups.
    pub fn batch_sql(&self) -> &str {
        &self.batch_sql
    }

    pub fn connection_query(&self, args: &ConnectionArgs) -> Result<ConnectionQuery, ConnectionError> {
        apply_connection_args(&self.compiled.query, args, &self.indexed_fields)
    }

    /// Batch key read off the source row. `None` for a missing or null column.
    pub fn object_key(&self, source: &Row) -> Option<Value> {
        match source.get(&self.compiled.object_key_column) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        }
    }

    /// Enqueue resolution of this field for `source` on `loaders`.
    ///
    /// Enqueueing happens before this returns; the future completes after the
    /// next [`RequestLoaders::flush`].
    pub fn resolve(
        self: &Arc<Self>,
        loaders: &RequestLoaders,
        source: &Row,
        args: ConnectionArgs,
        selection: ConnectionSelection,
    ) -> BoxFuture<'static, Result<FieldValue, ResolveError>> {
        let key = self.object_key(source);

        if self.is_plural() {
            let pending = match key {
                Some(key) => loaders.load_connection(self, key, args, selection),
                None => match self.connection_query(&args) {
                    Ok(_) => Pending::ready(Ok(Connection::default())),
                    Err(err) => Pending::ready(Err(err.into())),
                },
            };
            async move { pending.await.map(FieldValue::Connection) }.boxed()
        } else {
            let pending = match key {
                Some(key) => loaders.load_one(self, key),
                None => Pending::ready(Ok(None)),
            };
            async move { pending.await.map(FieldValue::Object) }.boxed()
        }
    }
}
