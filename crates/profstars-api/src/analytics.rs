//! Handlers for the analytics endpoints.

use axum::{Json, extract::State};
use profstars_core::{
  account::{Role, ensure_role},
  approval::ensure_admin,
  store::{AnalyticsSummary, ReviewBreakdown, Store},
};

use crate::{AppState, auth::AuthUser, error::ApiError};

/// `GET /api/admin/analytics`
pub async fn summary<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<AnalyticsSummary>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  ensure_admin(user.role)?;

  let summary = state.store.analytics_summary().await?;
  Ok(Json(summary))
}

/// `GET /api/professors/me/analytics` — a professor's own review aggregates.
pub async fn my_breakdown<S>(
  State(state): State<AppState<S>>,
  user: AuthUser,
) -> Result<Json<ReviewBreakdown>, ApiError>
where
  S: Store + Clone + Send + Sync + 'static,
{
  ensure_role(user.role, Role::Professor)?;

  let breakdown = state.store.review_breakdown(user.id).await?;
  Ok(Json(breakdown))
}
