//! JSON REST API for ProfStars.
//!
//! Exposes an axum [`Router`] backed by any [`profstars_core::store::Store`].
//! Authentication is a signed bearer token issued at login; every protected
//! handler goes through the same [`auth::AuthUser`] extractor.

pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod error;
pub mod professors;
pub mod reviews;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, patch, post},
};
use profstars_core::store::Store;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::JwtKeys;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Secret for signing bearer tokens. Rotating it invalidates all
  /// outstanding sessions.
  pub jwt_secret: String,

  /// When all three `admin_*` values are present, the account is seeded at
  /// startup. There is no other way to obtain the admin role.
  #[serde(default)]
  pub admin_name:          Option<String>,
  #[serde(default)]
  pub admin_email:         Option<String>,
  /// Argon2 PHC string; generate with `server --hash-password`.
  #[serde(default)]
  pub admin_password_hash: Option<String>,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: Store> {
  pub store: Arc<S>,
  pub jwt:   Arc<JwtKeys>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: Store + Clone + Send + Sync + 'static,
{
  Router::new()
    // Auth
    .route("/api/auth/register", post(accounts::register::<S>))
    .route("/api/auth/login", post(accounts::login::<S>))
    // Professor records
    .route(
      "/api/professors",
      get(professors::list::<S>).post(professors::submit::<S>),
    )
    .route("/api/professors/recent", get(professors::recent::<S>))
    .route(
      "/api/professors/me",
      get(professors::me::<S>).put(professors::update_me::<S>),
    )
    .route(
      "/api/professors/me/analytics",
      get(analytics::my_breakdown::<S>),
    )
    .route(
      "/api/professors/{id}",
      get(professors::detail::<S>).delete(professors::purge::<S>),
    )
    .route("/api/professors/{id}/approve", patch(professors::approve::<S>))
    .route("/api/professors/{id}/reject", patch(professors::reject::<S>))
    // Reviews
    .route("/api/reviews", post(reviews::create::<S>))
    .route("/api/reviews/mine", get(reviews::mine::<S>))
    // Admin
    .route("/api/admin/analytics", get(analytics::summary::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
