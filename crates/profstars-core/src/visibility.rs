//! Role-based visibility of professor records.
//!
//! Each list view is a pair of (authorization rule, store filter). The
//! public recent view is the only one an anonymous caller may see.

use serde::Deserialize;

use crate::{
  account::Role,
  error::{Error, Result},
  record::ApprovalState,
  store::RecordFilter,
};

/// Maximum number of records in the public recent view.
pub const RECENT_PUBLIC_LIMIT: usize = 5;

/// The list views the system exposes. Deserialises from the `status` query
/// parameter (`pending`, `approved`, `student-submitted`, `recent-public`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
  /// The five most recently added approved professors; public.
  RecentPublic,
  /// Pending records that were not student-submitted; admin only.
  Pending,
  /// All approved records, unbounded; admin only.
  Approved,
  /// Pending records carrying the sentinel email; admin only.
  StudentSubmitted,
}

impl ViewKind {
  /// Authorization rule for this view. `actor` is `None` for anonymous
  /// callers.
  pub fn authorize(self, actor: Option<Role>) -> Result<()> {
    match self {
      Self::RecentPublic => Ok(()),
      Self::Pending | Self::Approved | Self::StudentSubmitted => match actor {
        Some(Role::Admin) => Ok(()),
        _ => Err(Error::Unauthorized),
      },
    }
  }

  /// The store filter this view translates to. All views sort newest first.
  pub fn filter(self) -> RecordFilter {
    match self {
      Self::RecentPublic => RecordFilter {
        approval_state:    Some(ApprovalState::Approved),
        student_submitted: None,
        limit:             Some(RECENT_PUBLIC_LIMIT),
      },
      Self::Pending => RecordFilter {
        approval_state:    Some(ApprovalState::Pending),
        student_submitted: Some(false),
        limit:             None,
      },
      Self::Approved => RecordFilter {
        approval_state:    Some(ApprovalState::Approved),
        student_submitted: None,
        limit:             None,
      },
      Self::StudentSubmitted => RecordFilter {
        approval_state:    Some(ApprovalState::Pending),
        student_submitted: Some(true),
        limit:             None,
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recent_public_is_open_to_everyone() {
    assert!(ViewKind::RecentPublic.authorize(None).is_ok());
    assert!(ViewKind::RecentPublic.authorize(Some(Role::Student)).is_ok());
    assert!(ViewKind::RecentPublic.authorize(Some(Role::Admin)).is_ok());
  }

  #[test]
  fn admin_views_reject_everyone_else() {
    for view in [ViewKind::Pending, ViewKind::Approved, ViewKind::StudentSubmitted] {
      assert!(view.authorize(Some(Role::Admin)).is_ok());
      assert!(matches!(view.authorize(None), Err(Error::Unauthorized)));
      assert!(matches!(
        view.authorize(Some(Role::Student)),
        Err(Error::Unauthorized)
      ));
      assert!(matches!(
        view.authorize(Some(Role::Professor)),
        Err(Error::Unauthorized)
      ));
    }
  }

  #[test]
  fn recent_public_filter_is_capped_and_approved_only() {
    let filter = ViewKind::RecentPublic.filter();
    assert_eq!(filter.approval_state, Some(ApprovalState::Approved));
    assert_eq!(filter.limit, Some(RECENT_PUBLIC_LIMIT));
  }

  #[test]
  fn pending_views_split_on_the_sentinel() {
    assert_eq!(ViewKind::Pending.filter().student_submitted, Some(false));
    assert_eq!(
      ViewKind::StudentSubmitted.filter().student_submitted,
      Some(true)
    );
    assert_eq!(ViewKind::Approved.filter().limit, None);
  }
}
