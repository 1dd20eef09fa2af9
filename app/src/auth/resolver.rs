use actix_web::HttpRequest;
use actix_web::http::header::AUTHORIZATION;
use std::borrow::Cow;

use super::error::VerificationFailure;
use super::jwt::{JwtVerifier, UserId};
use crate::config::app_config::AuthConfig;

pub const AUTH_COOKIE: &str = "authToken";
const BEARER_PREFIX: &str = "Bearer ";

/// Picks the credential source: the authorization header wins, otherwise the
/// `authToken` cookie is wrapped as a bearer credential.
pub fn locate_credential<'a>(
    authorization: Option<&'a str>,
    auth_cookie: Option<&str>,
) -> Option<Cow<'a, str>> {
    match (authorization, auth_cookie) {
        (Some(header), _) if !header.is_empty() => Some(Cow::Borrowed(header)),
        (_, Some(cookie)) if !cookie.is_empty() => {
            Some(Cow::Owned(format!("{BEARER_PREFIX}{cookie}")))
        }
        _ => None,
    }
}

/// Second whitespace-separated segment of the credential. The scheme label is
/// not inspected.
pub fn extract_token(credential: &str) -> Option<&str> {
    credential.split_whitespace().nth(1)
}

/// Resolves the caller's identity from a bearer token.
///
/// Holds no mutable state; one instance is shared by every worker.
#[derive(Debug, Clone)]
pub struct TokenIdentityResolver {
    verifier: JwtVerifier,
}

impl TokenIdentityResolver {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            verifier: JwtVerifier::new(config),
        }
    }

    /// Identity of the request, or `None` for every kind of failure.
    pub fn resolve_identity(&self, req: &HttpRequest) -> Option<UserId> {
        self.resolve(req).ok().flatten()
    }

    /// Like [`resolve_identity`](Self::resolve_identity) but keeps the reason a
    /// request went unresolved. `Ok(None)` is a verified token without an `id`.
    pub fn resolve(&self, req: &HttpRequest) -> Result<Option<UserId>, VerificationFailure> {
        // Non-ASCII bytes are replaced rather than dropped, so the header still
        // shadows the cookie and fails verification.
        let authorization = req
            .headers()
            .get(AUTHORIZATION)
            .map(|value| String::from_utf8_lossy(value.as_bytes()));
        let cookie = req.cookie(AUTH_COOKIE);

        self.resolve_parts(
            authorization.as_deref(),
            cookie.as_ref().map(|c| c.value()),
        )
    }

    pub fn resolve_parts(
        &self,
        authorization: Option<&str>,
        auth_cookie: Option<&str>,
    ) -> Result<Option<UserId>, VerificationFailure> {
        let credential = locate_credential(authorization, auth_cookie)
            .ok_or(VerificationFailure::MissingCredential)?;
        let token = extract_token(&credential).ok_or(VerificationFailure::MissingToken)?;

        let claims = self.verifier.verify(token)?;

        Ok(claims.id)
    }
}
