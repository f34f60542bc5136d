//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings (which also makes the
//! `created_at` ordering lexicographic). UUIDs are stored as hyphenated
//! lowercase strings. Enums are stored as their lowercase names.

use chrono::{DateTime, Utc};
use profstars_core::{
  account::{Account, Role},
  record::{ApprovalState, ProfessorRecord},
  review::{Review, ReviewWithAuthor},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Student => "student",
    Role::Professor => "professor",
    Role::Admin => "admin",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "student" => Ok(Role::Student),
    "professor" => Ok(Role::Professor),
    "admin" => Ok(Role::Admin),
    other => Err(Error::UnknownEnum { field: "role", value: other.to_owned() }),
  }
}

// ─── ApprovalState ────────────────────────────────────────────────────────────

pub fn encode_approval_state(s: ApprovalState) -> &'static str {
  match s {
    ApprovalState::Pending => "pending",
    ApprovalState::Approved => "approved",
    ApprovalState::Rejected => "rejected",
  }
}

pub fn decode_approval_state(s: &str) -> Result<ApprovalState> {
  match s {
    "pending" => Ok(ApprovalState::Pending),
    "approved" => Ok(ApprovalState::Approved),
    "rejected" => Ok(ApprovalState::Rejected),
    other => Err(Error::UnknownEnum {
      field: "approval_state",
      value: other.to_owned(),
    }),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:        String,
  pub name:           String,
  pub email:          String,
  pub password_hash:  Option<String>,
  pub role:           String,
  pub approval_state: String,
  pub is_approved:    bool,
  pub university:     Option<String>,
  pub department:     Option<String>,
  pub country:        Option<String>,
  pub academic_title: Option<String>,
  pub submitted_by:   Option<String>,
  pub created_at:     String,
}

impl RawUser {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      id:             decode_uuid(&self.user_id)?,
      name:           self.name,
      email:          self.email,
      role:           decode_role(&self.role)?,
      approval_state: decode_approval_state(&self.approval_state)?,
      university:     self.university,
      department:     self.department,
      country:        self.country,
      academic_title: self.academic_title,
      password_hash:  self.password_hash,
      created_at:     decode_dt(&self.created_at)?,
    })
  }

  /// Project a professor row into the unified record. Only valid for rows
  /// with `role = 'professor'`; those always carry university + department.
  pub fn into_record(self) -> Result<ProfessorRecord> {
    let id = decode_uuid(&self.user_id)?;
    let university = self
      .university
      .ok_or_else(|| Error::Corrupt(format!("professor {id} has no university")))?;
    let department = self
      .department
      .ok_or_else(|| Error::Corrupt(format!("professor {id} has no department")))?;

    Ok(ProfessorRecord {
      id,
      name: self.name,
      email: self.email,
      university,
      department,
      country: self.country,
      academic_title: self.academic_title,
      approval_state: decode_approval_state(&self.approval_state)?,
      is_approved: self.is_approved,
      submitted_by: self
        .submitted_by
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `reviews` row joined with the author's name.
pub struct RawReview {
  pub review_id:    String,
  pub professor_id: String,
  pub student_id:   String,
  pub rating:       i64,
  pub semester:     String,
  pub subject:      String,
  pub comment:      Option<String>,
  pub created_at:   String,
  pub author:       String,
}

impl RawReview {
  pub fn into_review(self) -> Result<ReviewWithAuthor> {
    let review = Review {
      id:           decode_uuid(&self.review_id)?,
      professor_id: decode_uuid(&self.professor_id)?,
      student_id:   decode_uuid(&self.student_id)?,
      rating:       self.rating as u8,
      semester:     self.semester,
      subject:      self.subject,
      comment:      self.comment,
      created_at:   decode_dt(&self.created_at)?,
    };
    Ok(ReviewWithAuthor { review, author: self.author })
  }
}
