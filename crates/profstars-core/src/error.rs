//! Error taxonomy for `profstars-core`.
//!
//! Storage backends map their internal failures onto these variants, so the
//! lifecycle layer and the API layer only ever see this one enum.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("invalid value: {0}")]
  Validation(String),

  #[error("professor {name:?} at {university:?} already exists")]
  DuplicateRecord { name: String, university: String },

  #[error("email already registered: {0}")]
  EmailTaken(String),

  #[error("this professor has already been reviewed by this student")]
  AlreadyReviewed,

  #[error("record not found: {0}")]
  NotFound(Uuid),

  #[error("caller role does not permit this operation")]
  Unauthorized,

  /// The backing store is unreachable or failed internally. Transient; the
  /// core never retries — callers decide.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend-specific failure.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
