//! Bearer-token authentication: JWT issuing, verification, and the
//! [`AuthUser`] extractor.

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use profstars_core::{account::Role, store::Store};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Tokens expire one week after issue.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Signed token payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub sub:  Uuid,
  pub role: Role,
  pub exp:  i64,
}

/// HMAC keys derived from the configured secret.
pub struct JwtKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
}

impl JwtKeys {
  pub fn new(secret: &str) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
    }
  }

  /// Sign a token for `id` acting as `role`.
  pub fn issue(&self, id: Uuid, role: Role) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp();
    let claims = Claims { sub: id, role, exp };
    jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
      .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
  }

  /// Verify a token's signature and expiry. Any failure is an
  /// authentication failure; callers learn nothing more specific.
  pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
    jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
      .map(|data| data.claims)
      .map_err(|_| ApiError::Unauthenticated)
  }
}

/// The authenticated caller. Present in a handler's signature means the
/// request carried a valid bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
  pub id:   Uuid,
  pub role: Role,
}

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: Store + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header = parts
      .headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthenticated)?;

    let token = header
      .strip_prefix("Bearer ")
      .ok_or(ApiError::Unauthenticated)?;

    let claims = state.jwt.verify(token)?;
    Ok(AuthUser { id: claims.sub, role: claims.role })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn issue_and_verify_roundtrip() {
    let keys = JwtKeys::new("test-secret");
    let id = Uuid::new_v4();
    let token = keys.issue(id, Role::Student).unwrap();

    let claims = keys.verify(&token).unwrap();
    assert_eq!(claims.sub, id);
    assert_eq!(claims.role, Role::Student);
  }

  #[test]
  fn expired_token_is_rejected() {
    let keys = JwtKeys::new("test-secret");
    let claims = Claims {
      sub:  Uuid::new_v4(),
      role: Role::Admin,
      exp:  (Utc::now() - Duration::hours(2)).timestamp(),
    };
    let token =
      jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding)
        .unwrap();

    assert!(matches!(
      keys.verify(&token),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn token_signed_with_other_secret_is_rejected() {
    let keys = JwtKeys::new("test-secret");
    let other = JwtKeys::new("other-secret");
    let token = other.issue(Uuid::new_v4(), Role::Admin).unwrap();

    assert!(matches!(
      keys.verify(&token),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn garbage_token_is_rejected() {
    let keys = JwtKeys::new("test-secret");
    assert!(matches!(
      keys.verify("not.a.token"),
      Err(ApiError::Unauthenticated)
    ));
  }
}
