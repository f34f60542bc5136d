//! Handlers for `/api/professors` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/api/professors` | Submit a candidate; students and professors |
//! | `GET`   | `/api/professors?status=<view>` | Admin list views |
//! | `GET`   | `/api/professors/recent` | Public; 5 newest approved |
//! | `GET`   | `/api/professors/me` | Own profile; professors |
//! | `PUT`   | `/api/professors/me` | Partial profile update |
//! | `GET`   | `/api/professors/{id}` | Public detail with reviews |
//! | `PATCH` | `/api/professors/{id}/approve` | Admin; idempotent |
//! | `PATCH` | `/api/professors/{id}/reject` | Admin; soft, idempotent |
//! | `DELETE`| `/api/professors/{id}` | Admin; hard delete |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use profstars_core::{
  account::{Account, ProfileUpdate, Role, ensure_role},
  lifecycle::{self, SubmitProfessor},
  record::ProfessorRecord,
  review::ReviewWithAuthor,
  store::Store,
  visibility::ViewKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError};

// ─── Submission ──────────────────────────────────────────────────────────────

/// `POST /api/professors`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Json(body): Json<SubmitProfessor>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  // Admins curate through the approval endpoints, not by submitting.
  if user.role == Role::Admin {
    return Err(ApiError::Forbidden);
  }

  let record = lifecycle::submit_professor(&*state.store, user.id, body).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: ViewKind,
}

/// `GET /api/professors?status=pending|approved|student-submitted|recent-public`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProfessorRecord>>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  let records =
    lifecycle::list(&*state.store, Some(user.role), params.status).await?;
  Ok(Json(records))
}

/// `GET /api/professors/recent` — anonymous.
pub async fn recent<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ProfessorRecord>>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  let records =
    lifecycle::list(&*state.store, None, ViewKind::RecentPublic).await?;
  Ok(Json(records))
}

// ─── Detail ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DetailResponse {
  pub professor:      ProfessorRecord,
  pub reviews:        Vec<ReviewWithAuthor>,
  pub average_rating: Option<f64>,
}

/// `GET /api/professors/{id}`
pub async fn detail<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<DetailResponse>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  let professor = state
    .store
    .find_professor(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("professor {id} not found")))?;

  let reviews = state.store.reviews_for_professor(id).await?;
  let average_rating = state.store.average_rating(id).await?;

  Ok(Json(DetailResponse { professor, reviews, average_rating }))
}

// ─── Own profile ─────────────────────────────────────────────────────────────

/// `GET /api/professors/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<Account>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  ensure_role(user.role, Role::Professor)?;

  let account = state
    .store
    .find_account(user.id)
    .await?
    .ok_or(ApiError::Unauthenticated)?;
  Ok(Json(account))
}

/// `PUT /api/professors/me`
pub async fn update_me<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Json(update): Json<ProfileUpdate>,
) -> Result<Json<Account>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  ensure_role(user.role, Role::Professor)?;

  let account = state.store.update_profile(user.id, update).await?;
  Ok(Json(account))
}

// ─── Approval decisions ──────────────────────────────────────────────────────

/// `PATCH /api/professors/{id}/approve`
pub async fn approve<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(id): Path<Uuid>,
) -> Result<Json<ProfessorRecord>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  let record = lifecycle::approve(&*state.store, user.role, id).await?;
  Ok(Json(record))
}

/// `PATCH /api/professors/{id}/reject`
pub async fn reject<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(id): Path<Uuid>,
) -> Result<Json<ProfessorRecord>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  let record = lifecycle::reject(&*state.store, user.role, id).await?;
  Ok(Json(record))
}

/// `DELETE /api/professors/{id}`
pub async fn purge<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  lifecycle::purge(&*state.store, user.role, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
