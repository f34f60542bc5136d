//! Storage abstraction traits and supporting query types.
//!
//! Implemented by storage backends (e.g. `profstars-store-sqlite`). Higher
//! layers depend on these traits, not on any concrete backend.
//!
//! All methods return [`crate::Result`]: backends translate their internal
//! failures into the core taxonomy. In particular, uniqueness conflicts
//! surface as [`Error::DuplicateRecord`](crate::Error::DuplicateRecord),
//! [`Error::EmailTaken`](crate::Error::EmailTaken), or
//! [`Error::AlreadyReviewed`](crate::Error::AlreadyReviewed) — so a
//! concurrent duplicate submission that slips past the resolver pre-check is
//! still caught by the storage-level constraint.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Result,
  account::{Account, NewAccount, ProfileUpdate},
  record::{ApprovalState, ProfessorDraft, ProfessorRecord},
  review::{NewReview, Review, ReviewWithAuthor},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Predicate set for [`RecordStore::list_professors`]. Matching records are
/// always returned newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
  pub approval_state:    Option<ApprovalState>,
  /// `Some(true)`: only sentinel-email candidates; `Some(false)`: exclude
  /// them; `None`: both.
  pub student_submitted: Option<bool>,
  pub limit:             Option<usize>,
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
  pub total_professors:    u64,
  pub approved_professors: u64,
  pub pending_professors:  u64,
  pub total_students:      u64,
  pub total_admins:        u64,
  pub total_reviews:       u64,
  /// `None` when no reviews exist.
  pub average_rating:      Option<f64>,
}

/// Review aggregates for one professor's own dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewBreakdown {
  pub total_reviews:  u64,
  /// `None` when no reviews exist.
  pub average_rating: Option<f64>,
  /// Review counts per calendar month, oldest first.
  pub monthly:        Vec<MonthlyReviewCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReviewCount {
  /// `YYYY-MM`.
  pub month:   String,
  pub reviews: u64,
}

// ─── Professor records ───────────────────────────────────────────────────────

/// Persistence of professor records and their approval lifecycle.
pub trait RecordStore: Send + Sync {
  /// Persist a new professor record. The store assigns `id` and
  /// `created_at`, and starts the record `Pending` with
  /// `is_approved = false`. Fails with `DuplicateRecord` when the
  /// case-insensitive (name, university) pair is already taken.
  fn create_professor(
    &self,
    draft: ProfessorDraft,
  ) -> impl Future<Output = Result<ProfessorRecord>> + Send + '_;

  /// Retrieve a professor record by id. Returns `None` if not found.
  fn find_professor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ProfessorRecord>>> + Send + '_;

  /// The identity resolver lookup: case-insensitive whole-string match on
  /// both `name` and `university`, restricted to professor records.
  /// Read-only; returns the first match.
  fn find_duplicate<'a>(
    &'a self,
    name: &'a str,
    university: &'a str,
  ) -> impl Future<Output = Result<Option<ProfessorRecord>>> + Send + 'a;

  /// Set `approval_state` and the paired `is_approved` flag in one atomic
  /// write, returning the updated record. Fails with `NotFound` when `id`
  /// does not resolve to a professor record.
  fn update_approval_state(
    &self,
    id: Uuid,
    state: ApprovalState,
  ) -> impl Future<Output = Result<ProfessorRecord>> + Send + '_;

  /// Hard delete, together with the record's reviews. Returns `false` when
  /// nothing matched.
  fn delete_professor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  /// List professor records matching `filter`, newest first.
  fn list_professors(
    &self,
    filter: RecordFilter,
  ) -> impl Future<Output = Result<Vec<ProfessorRecord>>> + Send + '_;

  /// Aggregate counters over accounts and reviews.
  fn analytics_summary(
    &self,
  ) -> impl Future<Output = Result<AnalyticsSummary>> + Send + '_;
}

// ─── Accounts ────────────────────────────────────────────────────────────────

/// Persistence of login accounts. Creating a professor account also creates
/// its professor record (one row, two projections).
pub trait AccountStore: Send + Sync {
  /// Persist a new account. Professors start `Pending`; other roles are
  /// approved immediately. Fails with `EmailTaken` on an email conflict and
  /// `DuplicateRecord` when a professor's (name, university) is taken.
  fn create_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account>> + Send + '_;

  fn find_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>>> + Send + '_;

  /// Lookup by email, case-insensitive.
  fn find_account_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Account>>> + Send + 'a;

  /// Apply the non-`None` fields of `update` to the account's profile and
  /// return the result. Renaming a professor is subject to the identity
  /// constraint.
  fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Account>> + Send + '_;
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

/// Persistence of student reviews.
pub trait ReviewStore: Send + Sync {
  /// Record a review. Fails with `NotFound` when the professor does not
  /// exist and `AlreadyReviewed` when this student already reviewed them.
  fn add_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<Review>> + Send + '_;

  /// All reviews for a professor with their authors' names, newest first.
  fn reviews_for_professor(
    &self,
    professor_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ReviewWithAuthor>>> + Send + '_;

  /// Mean rating across a professor's reviews; `None` when there are none.
  fn average_rating(
    &self,
    professor_id: Uuid,
  ) -> impl Future<Output = Result<Option<f64>>> + Send + '_;

  /// Aggregates over one professor's reviews: total, mean rating, and a
  /// per-month trend.
  fn review_breakdown(
    &self,
    professor_id: Uuid,
  ) -> impl Future<Output = Result<ReviewBreakdown>> + Send + '_;
}

// ─── Combined bound ──────────────────────────────────────────────────────────

/// Convenience bound for layers that need the full storage surface.
pub trait Store: RecordStore + AccountStore + ReviewStore {}

impl<T: RecordStore + AccountStore + ReviewStore> Store for T {}
