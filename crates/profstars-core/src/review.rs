//! Student reviews of professors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Upper bound on review comment length, in characters.
pub const MAX_COMMENT_LEN: usize = 500;

/// A review as stored. One per (professor, student) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
  pub id:           Uuid,
  pub professor_id: Uuid,
  pub student_id:   Uuid,
  /// 1..=5 stars.
  pub rating:       u8,
  pub semester:     String,
  pub subject:      String,
  pub comment:      Option<String>,
  pub created_at:   DateTime<Utc>,
}

/// A review paired with its author's display name, for list views.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithAuthor {
  pub review: Review,
  pub author: String,
}

/// Input to [`crate::store::ReviewStore::add_review`].
#[derive(Debug, Clone)]
pub struct NewReview {
  pub professor_id: Uuid,
  pub student_id:   Uuid,
  pub rating:       u8,
  pub semester:     String,
  pub subject:      String,
  pub comment:      Option<String>,
}

impl NewReview {
  pub fn validate(&self) -> Result<()> {
    if !(1..=5).contains(&self.rating) {
      return Err(Error::Validation(format!(
        "rating must be between 1 and 5, got {}",
        self.rating
      )));
    }
    if self.semester.trim().is_empty() {
      return Err(Error::MissingField("semester"));
    }
    if self.subject.trim().is_empty() {
      return Err(Error::MissingField("subject"));
    }
    if let Some(comment) = &self.comment {
      if comment.chars().count() > MAX_COMMENT_LEN {
        return Err(Error::Validation(format!(
          "comment exceeds {MAX_COMMENT_LEN} characters"
        )));
      }
    }
    Ok(())
  }
}
