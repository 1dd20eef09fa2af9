use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

/// Why a request did not resolve to an identity.
///
/// Production callers only ever see "no identity"; the variants exist so tests
/// and debug logging can tell the cases apart.
#[derive(Debug, Error)]
pub enum VerificationFailure {
    #[error("no authorization header or authToken cookie")]
    MissingCredential,
    #[error("credential has no token segment")]
    MissingToken,
    #[error("JWT_SECRET is not configured")]
    SecretNotConfigured,
    #[error("malformed token: {0}")]
    Malformed(jsonwebtoken::errors::Error),
    #[error("signature does not match")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token algorithm is not accepted")]
    WrongAlgorithm,
    #[error("token verification failed: {0}")]
    Verifier(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for VerificationFailure {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::Malformed(e),
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::NotYetValid,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => Self::WrongAlgorithm,
            _ => Self::Verifier(e),
        }
    }
}
