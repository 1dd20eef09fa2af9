mod error;
mod jwt;
mod resolver;

pub use error::VerificationFailure;
pub use jwt::{Claims, JwtVerifier, UserId};
pub use resolver::{AUTH_COOKIE, TokenIdentityResolver, extract_token, locate_credential};

#[cfg(test)]
pub(crate) use jwt::test_support;
