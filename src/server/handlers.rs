use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use crate::sql_generator::{render, RenderOptions};
use crate::storage_plan::StorageLayout;

use super::{
    models::{SqlGenerationError, SqlGenerationRequest, SqlGenerationResponse},
    AppState,
};

pub async fn health_check(
    State(app_state): State<Arc<AppState>>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "edgepath",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "schema": app_state.config.schema_path,
        "relationships": app_state.schema.relationships().len()
    }))
}

/// Handler for GET /schema/storage - tables, columns and indices the schema needs
pub async fn storage_layout_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<StorageLayout> {
    Json(app_state.schema.layout())
}

/// Handler for POST /query/sql - render the SQL a relationship field resolves with
pub async fn sql_generation_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SqlGenerationRequest>,
) -> Result<Json<SqlGenerationResponse>, (StatusCode, Json<SqlGenerationError>)> {
    let resolver = app_state
        .schema
        .resolver(&payload.type_name, &payload.field)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(SqlGenerationError::new(
                    format!(
                        "No relationship `{}` on type `{}`",
                        payload.field, payload.type_name
                    ),
                    "UnknownRelationship",
                )),
            )
        })?;

    let compiled = resolver.compiled();
    let mut response = SqlGenerationResponse {
        relationship: resolver.qualified_name(),
        plural: resolver.is_plural(),
        object_key_column: compiled.object_key_column.clone(),
        sql: resolver.batch_sql().to_string(),
        total_count_sql: None,
        constrained_count_sql: None,
    };

    if resolver.is_plural() {
        let connection = resolver.connection_query(&payload.args).map_err(|e| {
            log::debug!("Rejected arguments for {}: {}", response.relationship, e);
            (
                StatusCode::BAD_REQUEST,
                Json(SqlGenerationError::new(e, "InvalidArguments")),
            )
        })?;

        response.sql = render(&connection.page, RenderOptions::rows());
        if payload.count {
            response.total_count_sql =
                Some(render(&connection.count_query(false), RenderOptions::count()));
            if connection.has_cursor() {
                response.constrained_count_sql =
                    Some(render(&connection.count_query(true), RenderOptions::count()));
            }
        }
    }

    log::debug!("Generated SQL for {}: {}", response.relationship, response.sql);
    Ok(Json(response))
}
