use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use handlers::{health_check, sql_generation_handler, storage_layout_handler};

use crate::config::ServerConfig;
use crate::graph_catalog::Schema;

pub mod handlers;
pub mod models;

#[derive(Clone)]
pub struct AppState {
    pub schema: Arc<Schema>,
    pub config: ServerConfig,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/schema/storage", get(storage_layout_handler))
        .route("/query/sql", post(sql_generation_handler))
        .with_state(Arc::new(app_state))
}

pub async fn run_with_config(config: ServerConfig) {
    log::info!(
        "Server configuration: http={}:{}, schema={}",
        config.http_host,
        config.http_port,
        config.schema_path
    );

    let schema = match Schema::from_yaml_file(&config.schema_path) {
        Ok(schema) => schema,
        Err(e) => {
            log::error!("Failed to load schema from {}: {}", config.schema_path, e);
            std::process::exit(1);
        }
    };

    let layout = schema.layout();
    log::info!(
        "Schema ready: {} relationships, {} foreign key columns, {} join tables, {} polymorphic views",
        schema.relationships().len(),
        layout.foreign_keys.len(),
        layout.join_tables.len(),
        layout.polymorphic_views.len()
    );

    let http_bind_address = format!("{}:{}", config.http_host, config.http_port);
    let app = router(AppState {
        schema: Arc::new(schema),
        config: config.clone(),
    });

    let http_listener = match TcpListener::bind(&http_bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", http_bind_address);
            listener
        }
        Err(e) => {
            log::error!(
                "Failed to bind HTTP listener to {}: {}",
                http_bind_address,
                e
            );
            log::error!("  Is another process using port {}?", config.http_port);
            std::process::exit(1);
        }
    };

    println!("edgepath server is running");
    println!("  HTTP API: http://{}", http_bind_address);

    if let Err(e) = axum::serve(http_listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("HTTP server error: {:?}", e);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
