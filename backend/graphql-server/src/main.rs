use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use graph_store::{GraphStore, MemoryStore, Neo4jStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;

use graphql_server::config::{Config, GraphBackend};
use graphql_server::handlers::{self, AppState};
use graphql_server::middleware::JwtMiddleware;
use graphql_server::schema::build_schema;
use graphql_server::services::seed::seed_categories;

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn GraphStore>> {
    match config.graph.backend {
        GraphBackend::Neo4j => {
            let store = Neo4jStore::new(&config.graph.uri, &config.graph.user, &config.graph.password)
                .context("Failed to create Neo4j store")?;
            info!(uri = %config.graph.uri, "Connected to Neo4j");
            Ok(Arc::new(store))
        }
        GraphBackend::Memory => {
            let store = MemoryStore::new();
            seed_categories(&store).await?;
            info!("Using in-memory graph store");
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,graphql_server=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(true),
        )
        .init();

    info!("Starting GraphQL server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    let store = connect_store(&config).await?;
    let schema = build_schema(&config.graphql);
    let state = AppState::new(schema, store);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!(
        workers = config.server.workers,
        max_depth = config.graphql.max_depth,
        "GraphQL server starting on http://{}",
        bind_addr
    );

    let secret = config.jwt.secret.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(JwtMiddleware::new(secret.clone()))
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::routes)
    })
    .workers(config.server.workers)
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await
    .context("Server error")
}
