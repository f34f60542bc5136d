//! Handlers for `/api/reviews` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/reviews` | Students; one per professor |
//! | `GET`  | `/api/reviews/mine` | Professors; reviews about them |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use profstars_core::{
  account::{Role, ensure_role},
  review::{NewReview, ReviewWithAuthor},
  store::Store,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::AuthUser, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub professor_id: Uuid,
  pub rating:       u8,
  pub semester:     String,
  pub subject:      String,
  #[serde(default)]
  pub comment:      Option<String>,
}

/// `POST /api/reviews`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  ensure_role(user.role, Role::Student)?;

  // The author always comes from the token, never from the body.
  let input = NewReview {
    professor_id: body.professor_id,
    student_id:   user.id,
    rating:       body.rating,
    semester:     body.semester,
    subject:      body.subject,
    comment:      body.comment,
  };
  input.validate()?;

  let review = state.store.add_review(input).await?;
  Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /api/reviews/mine` — the reviews written about the calling
/// professor.
pub async fn mine<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<Vec<ReviewWithAuthor>>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  ensure_role(user.role, Role::Professor)?;

  let reviews = state.store.reviews_for_professor(user.id).await?;
  Ok(Json(reviews))
}
