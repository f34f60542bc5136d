//! The professor-record lifecycle: submission, approval decisions, and
//! role-gated list views.
//!
//! HTTP-agnostic. The API layer authenticates the caller and passes the role
//! in; these functions enforce the preconditions and drive the store.

use serde::Deserialize;
use uuid::Uuid;

use crate::{
  account::Role,
  approval::{self, Decision, Transition},
  error::{Error, Result},
  identity,
  record::{ProfessorDraft, ProfessorRecord},
  store::RecordStore,
  visibility::ViewKind,
};

// ─── Submission ──────────────────────────────────────────────────────────────

/// A professor candidate as submitted by a student or professor on behalf of
/// someone else. The placeholder email is synthesized, never accepted from
/// the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitProfessor {
  pub name:           String,
  pub university:     String,
  pub department:     String,
  #[serde(default)]
  pub country:        Option<String>,
  #[serde(default)]
  pub academic_title: Option<String>,
}

impl SubmitProfessor {
  fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("name", &self.name),
      ("university", &self.university),
      ("department", &self.department),
    ] {
      if value.trim().is_empty() {
        return Err(Error::MissingField(field));
      }
    }
    Ok(())
  }
}

/// Submit a candidate on behalf of a professor. The new record starts
/// `Pending` with a sentinel email.
///
/// The identity resolver runs first for a friendly duplicate error; the
/// storage-level unique index backs the same invariant, so a concurrent
/// duplicate that races past the pre-check still surfaces as
/// [`Error::DuplicateRecord`].
pub async fn submit_professor<S: RecordStore>(
  store: &S,
  submitted_by: Uuid,
  input: SubmitProfessor,
) -> Result<ProfessorRecord> {
  input.validate()?;

  if store
    .find_duplicate(&input.name, &input.university)
    .await?
    .is_some()
  {
    return Err(Error::DuplicateRecord {
      name:       input.name,
      university: input.university,
    });
  }

  let draft = ProfessorDraft {
    email:          identity::pending_email(&input.name, &input.university),
    name:           input.name,
    university:     input.university,
    department:     input.department,
    country:        input.country,
    academic_title: input.academic_title,
    submitted_by:   Some(submitted_by),
  };

  store.create_professor(draft).await
}

// ─── Approval decisions ──────────────────────────────────────────────────────

/// Apply an admin decision to a record. Idempotent: a record already in the
/// target state is returned unchanged as a success.
pub async fn decide<S: RecordStore>(
  store: &S,
  actor: Role,
  id: Uuid,
  decision: Decision,
) -> Result<ProfessorRecord> {
  approval::ensure_admin(actor)?;

  let record = store
    .find_professor(id)
    .await?
    .ok_or(Error::NotFound(id))?;

  match approval::transition(record.approval_state, decision) {
    Transition::Unchanged => Ok(record),
    Transition::To(state) => store.update_approval_state(id, state).await,
  }
}

/// Approve a record; see [`decide`].
pub async fn approve<S: RecordStore>(
  store: &S,
  actor: Role,
  id: Uuid,
) -> Result<ProfessorRecord> {
  decide(store, actor, id, Decision::Approve).await
}

/// Soft-reject a record; it remains retrievable. See [`decide`].
pub async fn reject<S: RecordStore>(
  store: &S,
  actor: Role,
  id: Uuid,
) -> Result<ProfessorRecord> {
  decide(store, actor, id, Decision::Reject).await
}

/// Hard-delete a record and its reviews; admin only.
pub async fn purge<S: RecordStore>(store: &S, actor: Role, id: Uuid) -> Result<()> {
  approval::ensure_admin(actor)?;

  if store.delete_professor(id).await? {
    Ok(())
  } else {
    Err(Error::NotFound(id))
  }
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// List records through the visibility filter. `actor` is `None` for
/// anonymous callers.
pub async fn list<S: RecordStore>(
  store: &S,
  actor: Option<Role>,
  view: ViewKind,
) -> Result<Vec<ProfessorRecord>> {
  view.authorize(actor)?;
  store.list_professors(view.filter()).await
}
