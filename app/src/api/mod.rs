use crate::auth::TokenIdentityResolver;
use crate::middleware::IdentityMiddleware;
use actix_web::web::ServiceConfig;
use actix_web::{HttpResponse, web};
use std::sync::Arc;

mod users;

pub fn configure_routes(cfg: &mut ServiceConfig, resolver: Arc<TokenIdentityResolver>) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api").service(
            web::scope("/users")
                .wrap(IdentityMiddleware::new(resolver))
                .configure(users::configure_protected),
        ),
    );
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "UP",
        "message": "Service is running"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app_config::AuthConfig;
    use actix_web::{App, http::StatusCode, test};

    #[actix_web::test]
    async fn test_health_is_public() {
        let resolver = Arc::new(TokenIdentityResolver::new(&AuthConfig::default()));
        let app = test::init_service(
            App::new().configure(|config| configure_routes(config, resolver.clone())),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "UP");
    }
}
