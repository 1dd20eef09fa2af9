mod auth;

pub use auth::IdentityMiddleware;
