use actix_service::{Service, Transform};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::auth::TokenIdentityResolver;

/// Resolves the bearer identity of every request and stores the `UserId` in
/// request extensions. Requests are always forwarded; handlers decide what an
/// anonymous request may do.
pub struct IdentityMiddleware {
    resolver: Arc<TokenIdentityResolver>,
}

impl IdentityMiddleware {
    pub fn new(resolver: Arc<TokenIdentityResolver>) -> Self {
        IdentityMiddleware { resolver }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = IdentityMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service: Arc::new(service),
            resolver: self.resolver.clone(),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Arc<S>,
    resolver: Arc<TokenIdentityResolver>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.resolver.resolve(req.request()) {
            Ok(Some(user_id)) => {
                req.extensions_mut().insert(user_id);
            }
            Ok(None) => log::debug!("Verified token carries no id claim"),
            Err(err) => log::debug!("No identity resolved: {}", err),
        }

        let service = self.service.clone();

        Box::pin(async move { service.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{SECRET, valid_token};
    use crate::auth::{AUTH_COOKIE, UserId};
    use crate::config::app_config::AuthConfig;
    use actix_web::cookie::Cookie;
    use actix_web::{App, HttpRequest, HttpResponse, test, web};
    use serde_json::json;

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<UserId>() {
            Some(user_id) => HttpResponse::Ok().body(user_id.to_string()),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    async fn send(req: test::TestRequest) -> String {
        let resolver = Arc::new(TokenIdentityResolver::new(&AuthConfig::with_secret(
            SECRET,
        )));
        let app = test::init_service(
            App::new()
                .wrap(IdentityMiddleware::new(resolver))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let body = test::call_and_read_body(&app, req.uri("/whoami").to_request()).await;
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[actix_web::test]
    async fn test_anonymous_request_passes_through() {
        assert_eq!(send(test::TestRequest::get()).await, "anonymous");
    }

    #[actix_web::test]
    async fn test_invalid_token_passes_through_anonymous() {
        let req = test::TestRequest::get().insert_header(("Authorization", "Bearer invalid_token"));
        assert_eq!(send(req).await, "anonymous");
    }

    #[actix_web::test]
    async fn test_header_identity_is_stored() {
        let req = test::TestRequest::get().insert_header((
            "Authorization",
            format!("Bearer {}", valid_token(json!("alice"))),
        ));
        assert_eq!(send(req).await, "alice");
    }

    #[actix_web::test]
    async fn test_cookie_identity_is_stored() {
        let req = test::TestRequest::get()
            .cookie(Cookie::new(AUTH_COOKIE, valid_token(json!(123))));
        assert_eq!(send(req).await, "123");
    }

    #[actix_web::test]
    async fn test_bearer_token_with_extra_whitespace() {
        let req = test::TestRequest::get().insert_header((
            "Authorization",
            format!("Bearer   {}   ", valid_token(json!("bob"))),
        ));
        assert_eq!(send(req).await, "bob");
    }
}
