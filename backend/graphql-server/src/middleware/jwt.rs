//! Optional bearer-token authentication
//!
//! Requests without an `Authorization` header continue anonymously. A
//! header that is present but malformed, expired or signed with another
//! key is rejected with 401. Valid claims land in the request extensions.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::rc::Rc;
use tracing::debug;

/// JWT claims; `sub` is the user id
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    #[serde(default)]
    pub email: Option<String>,
}

pub struct JwtMiddleware {
    secret: Rc<String>,
}

impl JwtMiddleware {
    pub fn new(secret: String) -> Self {
        Self {
            secret: Rc::new(secret),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtMiddlewareService {
            service,
            secret: Rc::clone(&self.secret),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: S,
    secret: Rc<String>,
}

impl<S> JwtMiddlewareService<S> {
    fn claims(&self, header: &str) -> Result<Claims, &'static str> {
        let token = header
            .strip_prefix("Bearer ")
            .ok_or("Authorization must use Bearer scheme")?;

        let validation = Validation::new(Algorithm::HS256);
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected token: {}", e);
                "Invalid token"
            })
    }
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(header) = req.headers().get("Authorization") else {
            let fut = self.service.call(req);
            return Box::pin(fut);
        };

        let claims = match header.to_str() {
            Ok(value) => self.claims(value),
            Err(_) => Err("Invalid Authorization header"),
        };

        match claims {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(message) => {
                Box::pin(async move { Err(actix_web::error::ErrorUnauthorized(message)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpRequest, HttpResponse};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes";

    fn create_test_jwt(user_id: &str, expires_in_seconds: i64, secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + expires_in_seconds) as usize,
            iat: now as usize,
            email: Some("test@example.com".to_string()),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<Claims>() {
            Some(claims) => HttpResponse::Ok().body(claims.sub.clone()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    #[actix_web::test]
    async fn test_valid_jwt_sets_claims() {
        let app = test::init_service(
            App::new()
                .wrap(JwtMiddleware::new(SECRET.to_string()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let token = create_test_jwt("user-123", 3600, SECRET);
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "user-123");
    }

    #[actix_web::test]
    async fn test_missing_header_is_anonymous() {
        let app = test::init_service(
            App::new()
                .wrap(JwtMiddleware::new(SECRET.to_string()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "anonymous");
    }

    #[actix_web::test]
    async fn test_expired_jwt_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(JwtMiddleware::new(SECRET.to_string()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let token = create_test_jwt("user-123", -3600, SECRET);
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), 401);
    }

    #[actix_web::test]
    async fn test_wrong_secret_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(JwtMiddleware::new(SECRET.to_string()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let token = create_test_jwt("user-123", 3600, "another-secret-that-is-32-bytes-long");
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), 401);
    }

    #[actix_web::test]
    async fn test_non_bearer_scheme_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(JwtMiddleware::new(SECRET.to_string()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request();

        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), 401);
    }
}
