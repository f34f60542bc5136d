//! Identity resolution for professor candidates.
//!
//! Two professor records are the same identity when their (name, university)
//! pairs match case-insensitively as whole strings. The resolver lookup
//! itself lives on [`crate::store::RecordStore::find_duplicate`]; this module
//! holds the sentinel-email conventions around student submissions.

/// Domain of the synthesized addresses given to student-submitted candidates.
/// Nothing receives mail there; the pattern marks the record as
/// student-submitted for the admin views.
pub const PENDING_EMAIL_DOMAIN: &str = "pending.profstars.com";

/// Synthesize the placeholder address for a candidate submitted on behalf of
/// a professor. Both identity fields go into the local part so candidates
/// who share a name at different universities get distinct addresses,
/// keeping the email uniqueness invariant intact.
pub fn pending_email(name: &str, university: &str) -> String {
  format!("{}.{}@{PENDING_EMAIL_DOMAIN}", slug(name), slug(university))
}

/// Whitespace runs collapse to `.`, lowercased.
fn slug(s: &str) -> String {
  s.split_whitespace()
    .collect::<Vec<_>>()
    .join(".")
    .to_lowercase()
}

/// Whether `email` matches the student-submitted sentinel pattern.
pub fn is_student_submitted(email: &str) -> bool {
  email
    .rsplit_once('@')
    .is_some_and(|(_, domain)| domain.eq_ignore_ascii_case(PENDING_EMAIL_DOMAIN))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pending_email_slugifies_both_fields() {
    assert_eq!(
      pending_email("Jane Doe", "Test University"),
      "jane.doe.test.university@pending.profstars.com"
    );
    assert_eq!(
      pending_email("  Ada   Byron Lovelace ", "Cambridge"),
      "ada.byron.lovelace.cambridge@pending.profstars.com"
    );
  }

  #[test]
  fn same_name_at_different_universities_gets_distinct_addresses() {
    assert_ne!(
      pending_email("Jane Doe", "Cambridge"),
      pending_email("Jane Doe", "Oxford")
    );
  }

  #[test]
  fn sentinel_detection_is_case_insensitive() {
    assert!(is_student_submitted("jane.doe.oxford@pending.profstars.com"));
    assert!(is_student_submitted("jane.doe.oxford@PENDING.PROFSTARS.COM"));
    assert!(!is_student_submitted("jane.doe@uni.example.edu"));
    assert!(!is_student_submitted("no-at-sign"));
  }
}
