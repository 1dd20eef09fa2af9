use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::error::VerificationFailure;
use crate::config::app_config::{AuthConfig, MAX_LEEWAY_SECONDS};

/// Identifier carried in the `id` claim. Any JSON value is accepted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub serde_json::Value);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(serde_json::Value::String(id.to_string()))
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId(serde_json::Value::from(id))
    }
}

/// Payload fields read after verification.
///
/// `Validation` only enforces `exp`/`nbf` values it can read as unsigned
/// numbers, so the raw values are kept for the checks it skips.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default, deserialize_with = "present")]
    pub exp: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "present")]
    pub nbf: Option<serde_json::Value>,
}

// Keeps an explicit `null` as `Some(Value::Null)` so it is not mistaken for an
// absent claim.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl Claims {
    fn check_temporal_claims(&self) -> Result<(), VerificationFailure> {
        let exp = Self::timestamp(self.exp.as_ref())?;
        Self::timestamp(self.nbf.as_ref())?;

        match exp {
            Some(exp) if exp < 0.0 => Err(VerificationFailure::Expired),
            _ => Ok(()),
        }
    }

    // Present temporal claims must be JSON numbers.
    fn timestamp(value: Option<&serde_json::Value>) -> Result<Option<f64>, VerificationFailure> {
        match value {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| VerificationFailure::Malformed(ErrorKind::InvalidToken.into())),
        }
    }
}

/// HMAC verifier for compact JWTs.
///
/// `exp` and `nbf` are checked only when the token carries them.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("configured", &self.decoding_key.is_some())
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = config
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| DecodingKey::from_secret(s.as_bytes()));

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = config.leeway_seconds.min(MAX_LEEWAY_SECONDS);

        Self {
            decoding_key,
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, VerificationFailure> {
        let key = self
            .decoding_key
            .as_ref()
            .ok_or(VerificationFailure::SecretNotConfigured)?;

        let token_data = decode::<Claims>(token, key, &self.validation)?;
        token_data.claims.check_temporal_claims()?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::{Value, json};

    pub const SECRET: &str = "test_jwt_secret";

    pub fn sign(claims: &Value, secret: &str) -> String {
        sign_with(Header::default(), claims, secret)
    }

    pub fn sign_with(header: Header, claims: &Value, secret: &str) -> String {
        encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    pub fn expires_in(delta: Duration) -> i64 {
        Utc::now().checked_add_signed(delta).unwrap().timestamp()
    }

    pub fn valid_token(id: Value) -> String {
        sign(
            &json!({ "id": id, "exp": expires_in(Duration::hours(1)) }),
            SECRET,
        )
    }
}
