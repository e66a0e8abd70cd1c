//! edgepath - relationship paths compiled to batched SQL
//!
//! A schema declares each relationship field as a path of labeled, directed
//! segments (`=FOLLOWED=>User=AUTHORED=>`). From the full set of paths this
//! crate:
//! - parses and validates the path language
//! - pairs and collapses segments into a storage plan (foreign key columns
//!   or join tables)
//! - compiles every relationship into a join query keyed by the source object
//! - renders PostgreSQL text with positional parameters and cursor pagination
//! - batches per-request lookups through an injected query executor

pub mod config;
pub mod connection;
pub mod graph_catalog;
pub mod loader;
pub mod path_parser;
pub mod query_compiler;
pub mod server;
pub mod sql_generator;
pub mod storage_plan;
