//! HTTP routes: `/graphql`, `/health` and `/schema`

use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use async_graphql::{ErrorExtensions, Response};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use graph_store::GraphStore;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::middleware::Claims;
use crate::schema::AppSchema;

#[derive(Clone)]
pub struct AppState {
    pub schema: AppSchema,
    pub store: Arc<dyn GraphStore>,
}

impl AppState {
    pub fn new(schema: AppSchema, store: Arc<dyn GraphStore>) -> Self {
        Self { schema, store }
    }
}

/// Execute a GraphQL request with the caller's identity attached
pub async fn graphql_handler(
    state: web::Data<AppState>,
    http: HttpRequest,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let subject = http
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.sub.clone());

    let ctx = match RequestContext::load(Arc::clone(&state.store), subject.as_deref()).await {
        Ok(ctx) => ctx,
        Err(e) => {
            let error = ApiError::from(e.context("Failed to load identity")).extend();
            return Response::from_errors(vec![error.into_server_error(Default::default())])
                .into();
        }
    };

    state.schema.execute(req.into_inner().data(ctx)).await.into()
}

pub async fn health_handler(state: web::Data<AppState>) -> HttpResponse {
    match state.store.health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ok" })),
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
        }
    }
}

pub async fn schema_handler(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain")
        .body(state.schema.sdl())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/graphql", web::post().to(graphql_handler))
        .route("/health", web::get().to(health_handler))
        .route("/schema", web::get().to(schema_handler));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphQLConfig;
    use crate::middleware::JwtMiddleware;
    use crate::schema::build_schema;
    use actix_web::{test, App};
    use graph_store::{props, Label, MemoryStore};
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes";

    fn token_for(user_id: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + 3600) as usize,
            iat: now as usize,
            email: None,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn state() -> AppState {
        let store = Arc::new(MemoryStore::new());
        store
            .create_node(
                Label::User,
                props! { "id" => "u1", "name" => "Alice", "deleted" => false, "disabled" => false },
            )
            .await
            .unwrap();
        AppState::new(build_schema(&GraphQLConfig::default()), store)
    }

    #[actix_web::test]
    async fn test_current_user_from_token() {
        let app = test::init_service(
            App::new()
                .wrap(JwtMiddleware::new(SECRET.to_string()))
                .app_data(web::Data::new(state().await))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/graphql")
            .insert_header(("Authorization", format!("Bearer {}", token_for("u1"))))
            .set_json(json!({ "query": "{ currentUser { id name } }" }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["currentUser"]["name"], "Alice");
    }

    #[actix_web::test]
    async fn test_anonymous_current_user_is_null() {
        let app = test::init_service(
            App::new()
                .wrap(JwtMiddleware::new(SECRET.to_string()))
                .app_data(web::Data::new(state().await))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/graphql")
            .set_json(json!({ "query": "{ currentUser { id } }" }))
            .to_request();

        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"]["currentUser"].is_null());
    }

    #[actix_web::test]
    async fn test_health_reports_ok() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state().await))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }
}
