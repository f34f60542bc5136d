//! The unified professor record.
//!
//! Self-registered professors and student-submitted candidates share one
//! entity with a single approval state; the old split between a user table
//! and a separate professor table is gone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a professor record. New records always start
/// [`Pending`](ApprovalState::Pending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
  Pending,
  Approved,
  Rejected,
}

impl ApprovalState {
  pub fn is_approved(self) -> bool { matches!(self, Self::Approved) }
}

/// A professor entry as seen by students, admins, and the public views.
/// Never carries credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorRecord {
  pub id:             Uuid,
  pub name:           String,
  /// Unique, case-insensitive. Student-submitted candidates carry a
  /// synthesized sentinel address (see [`crate::identity`]) with no real
  /// mailbox behind it.
  pub email:          String,
  pub university:     String,
  pub department:     String,
  pub country:        Option<String>,
  pub academic_title: Option<String>,
  pub approval_state: ApprovalState,
  /// Always `approval_state == Approved`. The store writes the pair in one
  /// statement and its schema forbids drift.
  pub is_approved:    bool,
  /// The account that submitted this candidate; `None` for self-registered
  /// professors.
  pub submitted_by:   Option<Uuid>,
  /// Server-assigned; used for recency sorting. Never changes.
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::create_professor`].
/// `id`, `created_at`, and the initial approval state are set by the store.
#[derive(Debug, Clone)]
pub struct ProfessorDraft {
  pub name:           String,
  pub email:          String,
  pub university:     String,
  pub department:     String,
  pub country:        Option<String>,
  pub academic_title: Option<String>,
  pub submitted_by:   Option<Uuid>,
}
