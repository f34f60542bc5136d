//! Handlers for `/api/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/auth/register` | Students and professors; never admins |
//! | `POST` | `/api/auth/login` | Returns a bearer token |

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use profstars_core::{
  Error as CoreError,
  account::{NewAccount, Role},
  record::ApprovalState,
  store::Store,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

// ─── Register ────────────────────────────────────────────────────────────────

/// Roles accepted at the registration endpoint. Admin is deliberately
/// absent; admin accounts are only seeded from server configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterRole {
  Student,
  Professor,
}

impl From<RegisterRole> for Role {
  fn from(r: RegisterRole) -> Self {
    match r {
      RegisterRole::Student => Role::Student,
      RegisterRole::Professor => Role::Professor,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:           String,
  pub email:          String,
  pub password:       String,
  pub role:           RegisterRole,
  #[serde(default)]
  pub university:     Option<String>,
  #[serde(default)]
  pub department:     Option<String>,
  #[serde(default)]
  pub country:        Option<String>,
  #[serde(default)]
  pub academic_title: Option<String>,
}

/// `POST /api/auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  if body.password.trim().is_empty() {
    return Err(ApiError::BadRequest("password must not be empty".into()));
  }

  let input = NewAccount {
    name:           body.name,
    email:          body.email,
    password_hash:  Some(hash_password(&body.password)?),
    role:           body.role.into(),
    university:     body.university,
    department:     body.department,
    country:        body.country,
    academic_title: body.academic_title,
  };
  input.validate()?;

  let account = state.store.create_account(input).await?;

  let message = match account.role {
    Role::Professor => "registration received; awaiting admin approval",
    _ => "registration complete",
  };
  Ok((
    StatusCode::CREATED,
    Json(json!({
      "id":      account.id,
      "role":    account.role,
      "message": message,
    })),
  ))
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token: String,
  pub id:    Uuid,
  pub name:  String,
  pub role:  Role,
}

/// `POST /api/auth/login`
///
/// Every credential failure is the same 401; callers cannot probe which
/// emails are registered.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  let account = state
    .store
    .find_account_by_email(&body.email)
    .await?
    .ok_or(ApiError::Unauthenticated)?;

  let hash = account
    .password_hash
    .as_deref()
    .ok_or(ApiError::Unauthenticated)?;
  let parsed = PasswordHash::new(hash).map_err(|_| ApiError::Unauthenticated)?;
  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthenticated)?;

  // Professors cannot act until an admin approves them.
  if account.role == Role::Professor
    && account.approval_state != ApprovalState::Approved
  {
    return Err(ApiError::Forbidden);
  }

  let token = state.jwt.issue(account.id, account.role)?;
  Ok(Json(LoginResponse {
    token,
    id: account.id,
    name: account.name,
    role: account.role,
  }))
}

// ─── Admin seeding ───────────────────────────────────────────────────────────

/// Outcome of startup admin seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
  Created,
  AlreadyPresent,
  /// The configured email is held by a non-admin account; nothing seeded.
  EmailHeldByOther,
}

/// Create the configured admin account if it does not exist yet. An email
/// conflict only counts as success when the existing holder actually has the
/// admin role.
pub async fn seed_admin<S>(
  store: &S,
  name: &str,
  email: &str,
  password_hash: &str,
) -> Result<SeedOutcome, ApiError>
where
  S: Store,
{
  let input = NewAccount {
    name:           name.into(),
    email:          email.into(),
    password_hash:  Some(password_hash.into()),
    role:           Role::Admin,
    university:     None,
    department:     None,
    country:        None,
    academic_title: None,
  };

  match store.create_account(input).await {
    Ok(_) => Ok(SeedOutcome::Created),
    Err(CoreError::EmailTaken(_)) => {
      match store.find_account_by_email(email).await? {
        Some(account) if account.role == Role::Admin => {
          Ok(SeedOutcome::AlreadyPresent)
        }
        _ => Ok(SeedOutcome::EmailHeldByOther),
      }
    }
    Err(e) => Err(e.into()),
  }
}
