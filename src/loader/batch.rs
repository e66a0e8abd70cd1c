//! Request-scoped batching.
//!
//! Field resolvers enqueue work synchronously; [`RequestLoaders::flush`] then
//! turns everything queued so far into as few `execute` calls as possible:
//! one per singular relationship, one per distinct plural request.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};

use futures_util::future::{join, join_all, BoxFuture, FutureExt};
use serde_json::Value;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::connection::{Connection, ConnectionArgs, ConnectionQuery, ConnectionSelection, Edge};
use crate::graph_catalog::graph_schema::Schema;
use crate::query_compiler::{Query, BATCH_KEY_ALIAS};
use crate::sql_generator::{render, RenderOptions};

use super::errors::ResolveError;
use super::executor::{QueryExecutor, Row};
use super::resolver::{FieldValue, RelationshipResolver};

type Sender<T> = oneshot::Sender<Result<T, ResolveError>>;

/// Result of an enqueued load, available once the batch it joined has run.
pub struct Pending<T> {
    receiver: oneshot::Receiver<Result<T, ResolveError>>,
}

impl<T> Pending<T> {
    fn channel() -> (Sender<T>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Pending { receiver })
    }

    /// Already-resolved value; used for results that need no SQL.
    pub fn ready(result: Result<T, ResolveError>) -> Self {
        let (sender, pending) = Self::channel();
        let _ = sender.send(result);
        pending
    }
}

impl<T> Future for Pending<T> {
    type Output = Result<T, ResolveError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(ResolveError::Cancelled)))
    }
}

struct SingularBatch {
    resolver: Arc<RelationshipResolver>,
    waiters: Vec<(Value, Sender<Option<Row>>)>,
}

/// Plural requests coalesce only when everything affecting the SQL matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PluralKey {
    relationship: String,
    key: String,
    args: ConnectionArgs,
    selection: ConnectionSelection,
}

struct PluralRequest {
    resolver: Arc<RelationshipResolver>,
    key: Value,
    connection: ConnectionQuery,
    selection: ConnectionSelection,
    waiters: Vec<Sender<Connection>>,
}

#[derive(Default)]
struct Queues {
    singular: HashMap<String, SingularBatch>,
    plural: HashMap<PluralKey, PluralRequest>,
}

impl Queues {
    fn len(&self) -> usize {
        self.singular.len() + self.plural.len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loaders for one inbound operation. Create one per request and drop it with
/// the request; nothing is cached across requests.
pub struct RequestLoaders {
    request_id: Uuid,
    schema: Arc<Schema>,
    executor: Arc<dyn QueryExecutor>,
    queues: Mutex<Queues>,
}

impl RequestLoaders {
    pub fn new(schema: Arc<Schema>, executor: Arc<dyn QueryExecutor>) -> Self {
        RequestLoaders {
            request_id: Uuid::new_v4(),
            schema,
            executor,
            queues: Mutex::new(Queues::default()),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn queues(&self) -> MutexGuard<'_, Queues> {
        self.queues
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of SQL statements the next flush will run (before counts).
    pub fn pending_batches(&self) -> usize {
        self.queues().len()
    }

    /// Resolve `type_name.field` for `source` through the schema's resolver.
    pub fn resolve(
        &self,
        type_name: &str,
        field: &str,
        source: &Row,
        args: ConnectionArgs,
        selection: ConnectionSelection,
    ) -> BoxFuture<'static, Result<FieldValue, ResolveError>> {
        match self.schema.resolver(type_name, field) {
            Some(resolver) => resolver.resolve(self, source, args, selection),
            None => {
                let error = ResolveError::unknown_relationship(type_name, field);
                async move { Err(error) }.boxed()
            }
        }
    }

    pub fn load_one(
        &self,
        resolver: &Arc<RelationshipResolver>,
        key: Value,
    ) -> Pending<Option<Row>> {
        let (sender, pending) = Pending::channel();
        self.queues()
            .singular
            .entry(resolver.qualified_name())
            .or_insert_with(|| SingularBatch {
                resolver: Arc::clone(resolver),
                waiters: Vec::new(),
            })
            .waiters
            .push((key, sender));
        pending
    }

    /// Enqueue a page load. Invalid arguments resolve immediately, without SQL.
    pub fn load_connection(
        &self,
        resolver: &Arc<RelationshipResolver>,
        key: Value,
        args: ConnectionArgs,
        selection: ConnectionSelection,
    ) -> Pending<Connection> {
        let connection = match resolver.connection_query(&args) {
            Ok(connection) => connection,
            Err(err) => {
                log::debug!(
                    "[{}] {}: rejected arguments: {}",
                    self.request_id,
                    resolver.qualified_name(),
                    err
                );
                return Pending::ready(Err(err.into()));
            }
        };

        let (sender, pending) = Pending::channel();
        let batch_key = PluralKey {
            relationship: resolver.qualified_name(),
            key: key.to_string(),
            args,
            selection,
        };
        self.queues()
            .plural
            .entry(batch_key)
            .or_insert_with(|| PluralRequest {
                resolver: Arc::clone(resolver),
                key,
                connection,
                selection,
                waiters: Vec::new(),
            })
            .waiters
            .push(sender);
        pending
    }

    /// Run everything queued so far. Loads enqueued while this runs wait for
    /// the next flush.
    pub async fn flush(&self) {
        let queues = std::mem::take(&mut *self.queues());
        if queues.is_empty() {
            return;
        }

        log::debug!(
            "[{}] flushing {} singular batches, {} plural requests",
            self.request_id,
            queues.singular.len(),
            queues.plural.len()
        );

        let singular = join_all(queues.singular.into_values().map(|b| self.run_singular(b)));
        let plural = join_all(queues.plural.into_values().map(|r| self.run_plural(r)));
        join(singular, plural).await;
    }

    async fn run_singular(&self, batch: SingularBatch) {
        let resolver = batch.resolver;
        let mut seen = HashSet::new();
        let keys: Vec<Value> = batch
            .waiters
            .iter()
            .filter(|(key, _)| seen.insert(key.to_string()))
            .map(|(key, _)| key.clone())
            .collect();

        log::debug!(
            "[{}] {}: {} lookups, {} distinct keys",
            self.request_id,
            resolver.qualified_name(),
            batch.waiters.len(),
            keys.len()
        );

        let rows = match self
            .executor
            .execute(resolver.batch_sql(), &[Value::Array(keys)])
            .await
        {
            Ok(rows) => rows,
            Err(err) => {
                log::warn!(
                    "[{}] {} failed: {}",
                    self.request_id,
                    resolver.qualified_name(),
                    err
                );
                let error = ResolveError::execution(err);
                for (_, sender) in batch.waiters {
                    let _ = sender.send(Err(error.clone()));
                }
                return;
            }
        };

        let key_field = resolver.compiled().resolved_key_field();
        let mut by_key: HashMap<String, Row> = HashMap::new();
        for mut row in rows {
            let key = if key_field == BATCH_KEY_ALIAS {
                row.remove(BATCH_KEY_ALIAS)
            } else {
                row.get(key_field).cloned()
            };
            if let Some(key) = key {
                by_key.entry(key.to_string()).or_insert(row);
            }
        }

        for (key, sender) in batch.waiters {
            let _ = sender.send(Ok(by_key.get(&key.to_string()).cloned()));
        }
    }

    async fn run_plural(&self, request: PluralRequest) {
        let result = self.fetch_connection(&request).await;
        if let Err(err) = &result {
            log::warn!(
                "[{}] {} failed: {}",
                self.request_id,
                request.resolver.qualified_name(),
                err
            );
        }
        for sender in request.waiters {
            let _ = sender.send(result.clone());
        }
    }

    async fn fetch_connection(&self, request: &PluralRequest) -> Result<Connection, ResolveError> {
        let connection = &request.connection;
        let mut params = vec![Value::Array(vec![request.key.clone()])];
        if let Some(cursor) = &connection.cursor {
            params.push(Value::String(cursor.clone()));
        }

        let rows = self
            .executor
            .execute(&render(&connection.page, RenderOptions::rows()), &params)
            .await
            .map_err(ResolveError::execution)?;

        let mut result = Connection {
            edges: rows.into_iter().map(Edge::from_row).collect(),
            page_info: None,
            total_count: None,
        };

        if !request.selection.needs_count() {
            return Ok(result);
        }

        let total = self
            .count(&connection.count_query(false), &params[..1])
            .await?;
        if request.selection.total_count {
            result.total_count = Some(total);
        }
        if request.selection.page_info {
            let constrained = if connection.has_cursor() {
                self.count(&connection.count_query(true), &params).await?
            } else {
                total
            };
            result.page_info = Some(connection.page_info(total, constrained, &result.edges));
        }

        Ok(result)
    }

    async fn count(&self, query: &Query, params: &[Value]) -> Result<u64, ResolveError> {
        let rows = self
            .executor
            .execute(&render(query, RenderOptions::count()), params)
            .await
            .map_err(ResolveError::execution)?;

        Ok(rows
            .first()
            .and_then(|row| row.values().next())
            .and_then(|value| {
                value
                    .as_u64()
                    .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
            })
            .unwrap_or(0))
    }
}
