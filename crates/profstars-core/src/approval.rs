//! The approval state machine for professor records.
//!
//! Admins approve or reject; both decisions are idempotent, and
//! Approved↔Rejected re-classification is permitted. Rejection is soft — the
//! record stays in the store. Hard deletion is a separate, explicit purge.

use crate::{
  account::Role,
  error::{Error, Result},
  record::ApprovalState,
};

/// An admin decision applied to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
  Approve,
  Reject,
}

impl Decision {
  /// The state this decision drives the record into.
  pub fn target(self) -> ApprovalState {
    match self {
      Self::Approve => ApprovalState::Approved,
      Self::Reject => ApprovalState::Rejected,
    }
  }
}

/// Outcome of applying a decision against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  /// The record is already in the target state; nothing to write.
  Unchanged,
  To(ApprovalState),
}

/// Compute the transition for `decision` against `current`.
pub fn transition(current: ApprovalState, decision: Decision) -> Transition {
  let target = decision.target();
  if current == target {
    Transition::Unchanged
  } else {
    Transition::To(target)
  }
}

/// Only admins may drive approval transitions.
pub fn ensure_admin(actor: Role) -> Result<()> {
  if actor == Role::Admin {
    Ok(())
  } else {
    Err(Error::Unauthorized)
  }
}
