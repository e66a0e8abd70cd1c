//! Integration tests - a schema loaded from YAML through compilation,
//! rendering and request-scoped batching against a recording executor.

mod batching_tests;
mod blog_schema;
mod compile_render_tests;
mod polymorphic_tests;
mod storage_plan_tests;
