//! Integration tests for `SqliteStore` against an in-memory database.

use profstars_core::{
  Error as CoreError,
  account::{NewAccount, ProfileUpdate, Role},
  identity,
  lifecycle::{self, SubmitProfessor},
  record::{ApprovalState, ProfessorDraft},
  review::NewReview,
  store::{AccountStore, RecordFilter, RecordStore, ReviewStore},
  visibility::ViewKind,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn draft(name: &str, university: &str) -> ProfessorDraft {
  ProfessorDraft {
    name:           name.into(),
    email:          identity::pending_email(name, university),
    university:     university.into(),
    department:     "Physics".into(),
    country:        None,
    academic_title: None,
    submitted_by:   None,
  }
}

fn account(name: &str, email: &str, role: Role) -> NewAccount {
  NewAccount {
    name: name.into(),
    email: email.into(),
    password_hash: Some("$argon2id$stub".into()),
    role,
    university: (role == Role::Professor).then(|| "Test University".into()),
    department: (role == Role::Professor).then(|| "CS".into()),
    country: None,
    academic_title: None,
  }
}

fn submission(name: &str, university: &str) -> SubmitProfessor {
  SubmitProfessor {
    name:           name.into(),
    university:     university.into(),
    department:     "History".into(),
    country:        None,
    academic_title: None,
  }
}

// ─── Professor records ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_find_professor() {
  let s = store().await;

  let record = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();
  assert_eq!(record.approval_state, ApprovalState::Pending);
  assert!(!record.is_approved);

  let fetched = s.find_professor(record.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, record.id);
  assert_eq!(fetched.name, "Ada Lovelace");
  assert_eq!(fetched.university, "Cambridge");
}

#[tokio::test]
async fn find_professor_missing_returns_none() {
  let s = store().await;
  let result = s.find_professor(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn duplicate_identity_is_rejected_case_insensitively() {
  let s = store().await;
  s.create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();

  let err = s
    .create_professor(draft("ADA LOVELACE", "cambridge"))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::DuplicateRecord { .. }));
}

#[tokio::test]
async fn same_name_different_university_is_allowed() {
  let s = store().await;
  s.create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();
  s.create_professor(draft("Ada Lovelace", "Oxford"))
    .await
    .unwrap();
}

#[tokio::test]
async fn find_duplicate_matches_case_variants() {
  let s = store().await;
  let record = s
    .create_professor(draft("Grace Hopper", "Yale"))
    .await
    .unwrap();

  let hit = s.find_duplicate("GRACE HOPPER", "yale").await.unwrap();
  assert_eq!(hit.unwrap().id, record.id);

  let miss = s.find_duplicate("Grace Hopper", "Harvard").await.unwrap();
  assert!(miss.is_none());
}

#[tokio::test]
async fn approval_state_and_flag_move_together() {
  let s = store().await;
  let record = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();

  let approved = s
    .update_approval_state(record.id, ApprovalState::Approved)
    .await
    .unwrap();
  assert_eq!(approved.approval_state, ApprovalState::Approved);
  assert!(approved.is_approved);

  let rejected = s
    .update_approval_state(record.id, ApprovalState::Rejected)
    .await
    .unwrap();
  assert_eq!(rejected.approval_state, ApprovalState::Rejected);
  assert!(!rejected.is_approved);
}

#[tokio::test]
async fn update_approval_state_missing_errors() {
  let s = store().await;
  let err = s
    .update_approval_state(Uuid::new_v4(), ApprovalState::Approved)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn rejected_record_remains_retrievable() {
  let s = store().await;
  let record = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();
  s.update_approval_state(record.id, ApprovalState::Rejected)
    .await
    .unwrap();

  let fetched = s.find_professor(record.id).await.unwrap().unwrap();
  assert_eq!(fetched.approval_state, ApprovalState::Rejected);
}

#[tokio::test]
async fn delete_professor_removes_record_and_reviews() {
  let s = store().await;
  let prof = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();
  let student = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();
  s.add_review(NewReview {
    professor_id: prof.id,
    student_id:   student.id,
    rating:       5,
    semester:     "Fall 2025".into(),
    subject:      "Analytical Engines".into(),
    comment:      None,
  })
  .await
  .unwrap();

  assert!(s.delete_professor(prof.id).await.unwrap());
  assert!(s.find_professor(prof.id).await.unwrap().is_none());
  assert!(s.reviews_for_professor(prof.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_returns_false() {
  let s = store().await;
  assert!(!s.delete_professor(Uuid::new_v4()).await.unwrap());
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_approval_state() {
  let s = store().await;
  let a = s.create_professor(draft("A", "U1")).await.unwrap();
  s.create_professor(draft("B", "U2")).await.unwrap();
  s.create_professor(draft("C", "U3")).await.unwrap();
  s.update_approval_state(a.id, ApprovalState::Approved)
    .await
    .unwrap();

  let approved = s
    .list_professors(RecordFilter {
      approval_state: Some(ApprovalState::Approved),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(approved.len(), 1);
  assert_eq!(approved[0].id, a.id);

  let pending = s
    .list_professors(RecordFilter {
      approval_state: Some(ApprovalState::Pending),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(pending.len(), 2);
}

#[tokio::test]
async fn list_limit_returns_newest_first() {
  let s = store().await;
  let mut ids = Vec::new();
  for i in 0..7 {
    let r = s
      .create_professor(draft(&format!("Prof {i}"), &format!("U{i}")))
      .await
      .unwrap();
    s.update_approval_state(r.id, ApprovalState::Approved)
      .await
      .unwrap();
    ids.push(r.id);
  }

  let recent = s
    .list_professors(RecordFilter {
      approval_state: Some(ApprovalState::Approved),
      limit: Some(5),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(recent.len(), 5);
  let expected: Vec<_> = ids.iter().rev().take(5).copied().collect();
  let got: Vec<_> = recent.iter().map(|r| r.id).collect();
  assert_eq!(got, expected);
}

#[tokio::test]
async fn student_submitted_filter_splits_on_sentinel_email() {
  let s = store().await;
  let student = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();
  let candidate =
    lifecycle::submit_professor(&s, student.id, submission("Alan Turing", "Manchester"))
      .await
      .unwrap();
  let registered = s
    .create_account(account(
      "Emmy Noether",
      "emmy@uni.example.com",
      Role::Professor,
    ))
    .await
    .unwrap();

  let submitted = s
    .list_professors(RecordFilter {
      student_submitted: Some(true),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(submitted.len(), 1);
  assert_eq!(submitted[0].id, candidate.id);

  let self_registered = s
    .list_professors(RecordFilter {
      student_submitted: Some(false),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(self_registered.len(), 1);
  assert_eq!(self_registered[0].id, registered.id);
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn professor_account_starts_pending_others_approved() {
  let s = store().await;

  let student = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();
  assert_eq!(student.approval_state, ApprovalState::Approved);

  let prof = s
    .create_account(account(
      "Emmy Noether",
      "emmy@uni.example.com",
      Role::Professor,
    ))
    .await
    .unwrap();
  assert_eq!(prof.approval_state, ApprovalState::Pending);

  // The professor account projects as a professor record too.
  let record = s.find_professor(prof.id).await.unwrap().unwrap();
  assert_eq!(record.email, "emmy@uni.example.com");
  assert!(record.submitted_by.is_none());
}

#[tokio::test]
async fn email_conflict_is_case_insensitive() {
  let s = store().await;
  s.create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();

  let err = s
    .create_account(account("Other", "SAM@EXAMPLE.COM", Role::Student))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::EmailTaken(_)));
}

#[tokio::test]
async fn find_account_by_email_ignores_case() {
  let s = store().await;
  let created = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();

  let found = s
    .find_account_by_email("Sam@Example.Com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.id, created.id);
  assert_eq!(found.password_hash.as_deref(), Some("$argon2id$stub"));
}

#[tokio::test]
async fn update_profile_applies_partial_fields() {
  let s = store().await;
  let prof = s
    .create_account(account(
      "Emmy Noether",
      "emmy@uni.example.com",
      Role::Professor,
    ))
    .await
    .unwrap();

  let updated = s
    .update_profile(prof.id, ProfileUpdate {
      academic_title: Some("Dr.".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(updated.academic_title.as_deref(), Some("Dr."));
  assert_eq!(updated.name, "Emmy Noether");
  assert_eq!(updated.university.as_deref(), Some("Test University"));
}

#[tokio::test]
async fn update_profile_missing_account_errors() {
  let s = store().await;
  let err = s
    .update_profile(Uuid::new_v4(), ProfileUpdate::default())
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn renaming_onto_existing_identity_conflicts() {
  let s = store().await;
  s.create_professor(draft("Ada Lovelace", "Test University"))
    .await
    .unwrap();
  let prof = s
    .create_account(account(
      "Emmy Noether",
      "emmy@uni.example.com",
      Role::Professor,
    ))
    .await
    .unwrap();

  let err = s
    .update_profile(prof.id, ProfileUpdate {
      name: Some("ada lovelace".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::DuplicateRecord { .. }));
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

fn review(professor_id: Uuid, student_id: Uuid, rating: u8) -> NewReview {
  NewReview {
    professor_id,
    student_id,
    rating,
    semester: "Fall 2025".into(),
    subject: "Algorithms".into(),
    comment: Some("clear lectures".into()),
  }
}

#[tokio::test]
async fn add_review_and_average() {
  let s = store().await;
  let prof = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();
  let sam = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();
  let kim = s
    .create_account(account("Kim Student", "kim@example.com", Role::Student))
    .await
    .unwrap();

  s.add_review(review(prof.id, sam.id, 5)).await.unwrap();
  s.add_review(review(prof.id, kim.id, 2)).await.unwrap();

  let reviews = s.reviews_for_professor(prof.id).await.unwrap();
  assert_eq!(reviews.len(), 2);
  assert!(reviews.iter().any(|r| r.author == "Sam Student"));
  assert!(reviews.iter().any(|r| r.author == "Kim Student"));

  let avg = s.average_rating(prof.id).await.unwrap().unwrap();
  assert!((avg - 3.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn second_review_for_same_pair_conflicts() {
  let s = store().await;
  let prof = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();
  let sam = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();

  s.add_review(review(prof.id, sam.id, 4)).await.unwrap();
  let err = s.add_review(review(prof.id, sam.id, 1)).await.unwrap_err();
  assert!(matches!(err, CoreError::AlreadyReviewed));
}

#[tokio::test]
async fn review_for_missing_professor_errors() {
  let s = store().await;
  let sam = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();

  let err = s
    .add_review(review(Uuid::new_v4(), sam.id, 4))
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn average_rating_none_without_reviews() {
  let s = store().await;
  let prof = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();
  assert!(s.average_rating(prof.id).await.unwrap().is_none());
}

#[tokio::test]
async fn review_breakdown_aggregates_per_professor() {
  let s = store().await;
  let prof = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();
  let other = s
    .create_professor(draft("Grace Hopper", "Yale"))
    .await
    .unwrap();
  let sam = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();
  let kim = s
    .create_account(account("Kim Student", "kim@example.com", Role::Student))
    .await
    .unwrap();

  s.add_review(review(prof.id, sam.id, 5)).await.unwrap();
  s.add_review(review(prof.id, kim.id, 2)).await.unwrap();
  s.add_review(review(other.id, sam.id, 1)).await.unwrap();

  let breakdown = s.review_breakdown(prof.id).await.unwrap();
  assert_eq!(breakdown.total_reviews, 2);
  assert!((breakdown.average_rating.unwrap() - 3.5).abs() < f64::EPSILON);

  // Both reviews land in the current month.
  assert_eq!(breakdown.monthly.len(), 1);
  assert_eq!(breakdown.monthly[0].reviews, 2);
  assert_eq!(breakdown.monthly[0].month.len(), 7);
}

#[tokio::test]
async fn review_breakdown_empty_without_reviews() {
  let s = store().await;
  let prof = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();

  let breakdown = s.review_breakdown(prof.id).await.unwrap();
  assert_eq!(breakdown.total_reviews, 0);
  assert!(breakdown.average_rating.is_none());
  assert!(breakdown.monthly.is_empty());
}

// ─── Analytics ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn analytics_counts_roles_states_and_reviews() {
  let s = store().await;
  let sam = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();
  s.create_account(account("Ada Admin", "admin@example.com", Role::Admin))
    .await
    .unwrap();
  let p1 = s.create_professor(draft("P One", "U1")).await.unwrap();
  s.create_professor(draft("P Two", "U2")).await.unwrap();
  s.update_approval_state(p1.id, ApprovalState::Approved)
    .await
    .unwrap();
  s.add_review(review(p1.id, sam.id, 4)).await.unwrap();

  let summary = s.analytics_summary().await.unwrap();
  assert_eq!(summary.total_professors, 2);
  assert_eq!(summary.approved_professors, 1);
  assert_eq!(summary.pending_professors, 1);
  assert_eq!(summary.total_students, 1);
  assert_eq!(summary.total_admins, 1);
  assert_eq!(summary.total_reviews, 1);
  assert!((summary.average_rating.unwrap() - 4.0).abs() < f64::EPSILON);
}

// ─── Lifecycle over the real store ───────────────────────────────────────────

#[tokio::test]
async fn submit_then_duplicate_submission_conflicts() {
  let s = store().await;
  let student = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();

  let record =
    lifecycle::submit_professor(&s, student.id, submission("Alan Turing", "Manchester"))
      .await
      .unwrap();
  assert_eq!(record.email, "alan.turing.manchester@pending.profstars.com");
  assert_eq!(record.submitted_by, Some(student.id));

  let err =
    lifecycle::submit_professor(&s, student.id, submission("alan TURING", "MANCHESTER"))
      .await
      .unwrap_err();
  assert!(matches!(err, CoreError::DuplicateRecord { .. }));
}

#[tokio::test]
async fn submitting_same_name_at_another_university_succeeds() {
  let s = store().await;
  let student = s
    .create_account(account("Sam Student", "sam@example.com", Role::Student))
    .await
    .unwrap();

  let first =
    lifecycle::submit_professor(&s, student.id, submission("Jane Doe", "Cambridge"))
      .await
      .unwrap();
  let second =
    lifecycle::submit_professor(&s, student.id, submission("Jane Doe", "Oxford"))
      .await
      .unwrap();

  assert_ne!(first.id, second.id);
  assert_ne!(first.email, second.email);
  assert_eq!(second.university, "Oxford");
}

#[tokio::test]
async fn approve_is_idempotent_and_admin_only() {
  let s = store().await;
  let record = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();

  let err = lifecycle::approve(&s, Role::Student, record.id)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Unauthorized));

  let first = lifecycle::approve(&s, Role::Admin, record.id).await.unwrap();
  assert!(first.is_approved);
  let second = lifecycle::approve(&s, Role::Admin, record.id).await.unwrap();
  assert!(second.is_approved);
}

#[tokio::test]
async fn purge_deletes_and_second_purge_errors() {
  let s = store().await;
  let record = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();

  lifecycle::purge(&s, Role::Admin, record.id).await.unwrap();
  let err = lifecycle::purge(&s, Role::Admin, record.id)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn list_views_enforce_visibility() {
  let s = store().await;
  let record = s
    .create_professor(draft("Ada Lovelace", "Cambridge"))
    .await
    .unwrap();
  s.update_approval_state(record.id, ApprovalState::Approved)
    .await
    .unwrap();

  // Anonymous callers only get the public recent view.
  let public = lifecycle::list(&s, None, ViewKind::RecentPublic)
    .await
    .unwrap();
  assert_eq!(public.len(), 1);

  let err = lifecycle::list(&s, None, ViewKind::Pending)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Unauthorized));

  let err = lifecycle::list(&s, Some(Role::Student), ViewKind::Pending)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Unauthorized));

  let pending = lifecycle::list(&s, Some(Role::Admin), ViewKind::Pending)
    .await
    .unwrap();
  assert!(pending.is_empty());
}
