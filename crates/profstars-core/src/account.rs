//! Accounts — students, professors, and admins.
//!
//! Professors are accounts whose row doubles as their
//! [`ProfessorRecord`](crate::record::ProfessorRecord); the store keeps that
//! unification internal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  record::ApprovalState,
};

/// The caller roles the system distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Professor,
  Admin,
}

/// Fail with [`Error::Unauthorized`] unless `actor` holds `required`.
pub fn ensure_role(actor: Role, required: Role) -> Result<()> {
  if actor == required {
    Ok(())
  } else {
    Err(Error::Unauthorized)
  }
}

/// A registered account. Serialisation always skips the credential hash.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
  pub id:             Uuid,
  pub name:           String,
  pub email:          String,
  pub role:           Role,
  /// Meaningful only for professors; other roles are approved at creation.
  pub approval_state: ApprovalState,
  pub university:     Option<String>,
  pub department:     Option<String>,
  pub country:        Option<String>,
  pub academic_title: Option<String>,
  /// Argon2 PHC string. `None` for student-submitted professor candidates,
  /// which have no login.
  #[serde(skip)]
  pub password_hash:  Option<String>,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::AccountStore::create_account`]. The password is
/// hashed by the caller; the store never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub name:           String,
  pub email:          String,
  pub password_hash:  Option<String>,
  pub role:           Role,
  pub university:     Option<String>,
  pub department:     Option<String>,
  pub country:        Option<String>,
  pub academic_title: Option<String>,
}

impl NewAccount {
  /// Field-level checks shared by registration and admin seeding.
  ///
  /// Professors must name a university and department because the identity
  /// invariant keys on them.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("name"));
    }
    if self.email.trim().is_empty() {
      return Err(Error::MissingField("email"));
    }
    if self.role == Role::Professor {
      if self.university.as_deref().is_none_or(|u| u.trim().is_empty()) {
        return Err(Error::MissingField("university"));
      }
      if self.department.as_deref().is_none_or(|d| d.trim().is_empty()) {
        return Err(Error::MissingField("department"));
      }
    }
    Ok(())
  }
}

/// Fields a professor may change on their own profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
  pub name:           Option<String>,
  pub university:     Option<String>,
  pub department:     Option<String>,
  pub country:        Option<String>,
  pub academic_title: Option<String>,
}
