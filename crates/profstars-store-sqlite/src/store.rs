//! [`SqliteStore`] — the SQLite implementation of the core storage traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use profstars_core::{
  Error as CoreError,
  account::{Account, NewAccount, ProfileUpdate, Role},
  identity::PENDING_EMAIL_DOMAIN,
  record::{ApprovalState, ProfessorDraft, ProfessorRecord},
  review::{NewReview, Review, ReviewWithAuthor},
  store::{
    AccountStore, AnalyticsSummary, MonthlyReviewCount, RecordFilter,
    RecordStore, ReviewBreakdown, ReviewStore,
  },
};

use crate::{
  Error,
  encode::{
    RawReview, RawUser, encode_approval_state, encode_dt, encode_role,
    encode_uuid,
  },
  schema::SCHEMA,
};

type CoreResult<T> = std::result::Result<T, CoreError>;

const USER_COLUMNS: &str = "user_id, name, email, password_hash, role, \
   approval_state, is_approved, university, department, country, \
   academic_title, submitted_by, created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ProfStars store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> crate::Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> crate::Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-encoded `users` row.
  async fn insert_user(
    &self,
    row: NewUserRow,
  ) -> std::result::Result<(), tokio_rusqlite::Error> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (
             user_id, name, email, password_hash, role, approval_state,
             is_approved, university, department, country, academic_title,
             submitted_by, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            row.user_id,
            row.name,
            row.email,
            row.password_hash,
            row.role,
            row.approval_state,
            row.is_approved,
            row.university,
            row.department,
            row.country,
            row.academic_title,
            row.submitted_by,
            row.created_at,
          ],
        )?;
        Ok(())
      })
      .await
  }

  async fn fetch_account(&self, id: Uuid) -> CoreResult<Option<Account>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              raw_user,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    raw
      .map(RawUser::into_account)
      .transpose()
      .map_err(CoreError::from)
  }
}

/// Pre-encoded column values for a `users` insert.
struct NewUserRow {
  user_id:        String,
  name:           String,
  email:          String,
  password_hash:  Option<String>,
  role:           &'static str,
  approval_state: &'static str,
  is_approved:    bool,
  university:     Option<String>,
  department:     Option<String>,
  country:        Option<String>,
  academic_title: Option<String>,
  submitted_by:   Option<String>,
  created_at:     String,
}

// ─── Row mappers and conflict mapping ────────────────────────────────────────

fn raw_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:        row.get(0)?,
    name:           row.get(1)?,
    email:          row.get(2)?,
    password_hash:  row.get(3)?,
    role:           row.get(4)?,
    approval_state: row.get(5)?,
    is_approved:    row.get(6)?,
    university:     row.get(7)?,
    department:     row.get(8)?,
    country:        row.get(9)?,
    academic_title: row.get(10)?,
    submitted_by:   row.get(11)?,
    created_at:     row.get(12)?,
  })
}

fn raw_review(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawReview> {
  Ok(RawReview {
    review_id:    row.get(0)?,
    professor_id: row.get(1)?,
    student_id:   row.get(2)?,
    rating:       row.get(3)?,
    semester:     row.get(4)?,
    subject:      row.get(5)?,
    comment:      row.get(6)?,
    created_at:   row.get(7)?,
    author:       row.get(8)?,
  })
}

/// The constraint-violation message, if `e` is one.
fn constraint_message(e: &tokio_rusqlite::Error) -> Option<&str> {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
    err,
    Some(msg),
  )) = e
  {
    if err.code == rusqlite::ErrorCode::ConstraintViolation {
      return Some(msg.as_str());
    }
  }
  None
}

/// Translate a `users` insert/update failure into the core taxonomy.
fn map_user_conflict(
  e: tokio_rusqlite::Error,
  name: &str,
  university: &str,
  email: &str,
) -> CoreError {
  if let Some(msg) = constraint_message(&e) {
    if msg.contains("professors_identity_idx") {
      return CoreError::DuplicateRecord {
        name:       name.to_owned(),
        university: university.to_owned(),
      };
    }
    if msg.contains("users.email") {
      return CoreError::EmailTaken(email.to_owned());
    }
  }
  Error::Database(e).into()
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  async fn create_professor(
    &self,
    draft: ProfessorDraft,
  ) -> CoreResult<ProfessorRecord> {
    let record = ProfessorRecord {
      id:             Uuid::new_v4(),
      name:           draft.name,
      email:          draft.email,
      university:     draft.university,
      department:     draft.department,
      country:        draft.country,
      academic_title: draft.academic_title,
      approval_state: ApprovalState::Pending,
      is_approved:    false,
      submitted_by:   draft.submitted_by,
      created_at:     Utc::now(),
    };

    let row = NewUserRow {
      user_id:        encode_uuid(record.id),
      name:           record.name.clone(),
      email:          record.email.clone(),
      password_hash:  None,
      role:           encode_role(Role::Professor),
      approval_state: encode_approval_state(record.approval_state),
      is_approved:    record.is_approved,
      university:     Some(record.university.clone()),
      department:     Some(record.department.clone()),
      country:        record.country.clone(),
      academic_title: record.academic_title.clone(),
      submitted_by:   record.submitted_by.map(encode_uuid),
      created_at:     encode_dt(record.created_at),
    };

    match self.insert_user(row).await {
      Ok(()) => Ok(record),
      Err(e) => Err(map_user_conflict(
        e,
        &record.name,
        &record.university,
        &record.email,
      )),
    }
  }

  async fn find_professor(&self, id: Uuid) -> CoreResult<Option<ProfessorRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE user_id = ?1 AND role = 'professor'"
              ),
              rusqlite::params![id_str],
              raw_user,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    raw
      .map(RawUser::into_record)
      .transpose()
      .map_err(CoreError::from)
  }

  async fn find_duplicate<'a>(
    &'a self,
    name: &'a str,
    university: &'a str,
  ) -> CoreResult<Option<ProfessorRecord>> {
    let name = name.to_owned();
    let university = university.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE role = 'professor'
                   AND lower(name) = lower(?1)
                   AND lower(university) = lower(?2)
                 LIMIT 1"
              ),
              rusqlite::params![name, university],
              raw_user,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    raw
      .map(RawUser::into_record)
      .transpose()
      .map_err(CoreError::from)
  }

  async fn update_approval_state(
    &self,
    id: Uuid,
    state: ApprovalState,
  ) -> CoreResult<ProfessorRecord> {
    let id_str = encode_uuid(id);
    let state_str = encode_approval_state(state);
    let approved = state.is_approved();

    // The state and its derived flag always move together.
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET approval_state = ?2, is_approved = ?3
           WHERE user_id = ?1 AND role = 'professor'",
          rusqlite::params![id_str, state_str, approved],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if affected == 0 {
      return Err(CoreError::NotFound(id));
    }

    self
      .find_professor(id)
      .await?
      .ok_or(CoreError::NotFound(id))
  }

  async fn delete_professor(&self, id: Uuid) -> CoreResult<bool> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM reviews WHERE professor_id = ?1",
          rusqlite::params![id_str],
        )?;
        let n = tx.execute(
          "DELETE FROM users WHERE user_id = ?1 AND role = 'professor'",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(n)
      })
      .await
      .map_err(Error::Database)?;

    Ok(deleted > 0)
  }

  async fn list_professors(
    &self,
    filter: RecordFilter,
  ) -> CoreResult<Vec<ProfessorRecord>> {
    let state_str = filter
      .approval_state
      .map(encode_approval_state)
      .map(str::to_owned);
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val = filter.limit.map_or(-1, |l| l as i64);
    let student_submitted = filter.student_submitted;

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically.
        let mut conds: Vec<String> = vec!["role = 'professor'".to_owned()];
        if state_str.is_some() {
          conds.push("approval_state = ?1".to_owned());
        }
        match student_submitted {
          Some(true) => {
            conds.push(format!("email LIKE '%@{PENDING_EMAIL_DOMAIN}'"));
          }
          Some(false) => {
            conds.push(format!("email NOT LIKE '%@{PENDING_EMAIL_DOMAIN}'"));
          }
          None => {}
        }

        let sql = format!(
          "SELECT {USER_COLUMNS} FROM users
           WHERE {}
           ORDER BY created_at DESC
           LIMIT ?2",
          conds.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![state_str.as_deref(), limit_val],
            raw_user,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    raws
      .into_iter()
      .map(|r| r.into_record().map_err(CoreError::from))
      .collect()
  }

  async fn analytics_summary(&self) -> CoreResult<AnalyticsSummary> {
    let summary = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT
             (SELECT COUNT(*) FROM users WHERE role = 'professor'),
             (SELECT COUNT(*) FROM users
                WHERE role = 'professor' AND approval_state = 'approved'),
             (SELECT COUNT(*) FROM users
                WHERE role = 'professor' AND approval_state = 'pending'),
             (SELECT COUNT(*) FROM users WHERE role = 'student'),
             (SELECT COUNT(*) FROM users WHERE role = 'admin'),
             (SELECT COUNT(*) FROM reviews),
             (SELECT AVG(rating) FROM reviews)",
          [],
          |row| {
            Ok(AnalyticsSummary {
              total_professors:    row.get::<_, i64>(0)? as u64,
              approved_professors: row.get::<_, i64>(1)? as u64,
              pending_professors:  row.get::<_, i64>(2)? as u64,
              total_students:      row.get::<_, i64>(3)? as u64,
              total_admins:        row.get::<_, i64>(4)? as u64,
              total_reviews:       row.get::<_, i64>(5)? as u64,
              average_rating:      row.get(6)?,
            })
          },
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(summary)
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  async fn create_account(&self, input: NewAccount) -> CoreResult<Account> {
    // Professors need an admin decision before they can act.
    let approval_state = if input.role == Role::Professor {
      ApprovalState::Pending
    } else {
      ApprovalState::Approved
    };

    let account = Account {
      id: Uuid::new_v4(),
      name: input.name,
      email: input.email,
      role: input.role,
      approval_state,
      university: input.university,
      department: input.department,
      country: input.country,
      academic_title: input.academic_title,
      password_hash: input.password_hash,
      created_at: Utc::now(),
    };

    let row = NewUserRow {
      user_id:        encode_uuid(account.id),
      name:           account.name.clone(),
      email:          account.email.clone(),
      password_hash:  account.password_hash.clone(),
      role:           encode_role(account.role),
      approval_state: encode_approval_state(account.approval_state),
      is_approved:    account.approval_state.is_approved(),
      university:     account.university.clone(),
      department:     account.department.clone(),
      country:        account.country.clone(),
      academic_title: account.academic_title.clone(),
      submitted_by:   None,
      created_at:     encode_dt(account.created_at),
    };

    match self.insert_user(row).await {
      Ok(()) => Ok(account),
      Err(e) => Err(map_user_conflict(
        e,
        &account.name,
        account.university.as_deref().unwrap_or_default(),
        &account.email,
      )),
    }
  }

  async fn find_account(&self, id: Uuid) -> CoreResult<Option<Account>> {
    self.fetch_account(id).await
  }

  async fn find_account_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> CoreResult<Option<Account>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        // The email column collates NOCASE, so plain equality is
        // case-insensitive here.
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
              rusqlite::params![email],
              raw_user,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    raw
      .map(RawUser::into_account)
      .transpose()
      .map_err(CoreError::from)
  }

  async fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> CoreResult<Account> {
    let current = self.fetch_account(id).await?.ok_or(CoreError::NotFound(id))?;

    let name = update.name.unwrap_or(current.name);
    let university = update.university.or(current.university);
    let department = update.department.or(current.department);
    let country = update.country.or(current.country);
    let academic_title = update.academic_title.or(current.academic_title);

    let id_str = encode_uuid(id);
    let name_cl = name.clone();
    let university_cl = university.clone();
    let department_cl = department.clone();
    let country_cl = country.clone();
    let title_cl = academic_title.clone();

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET name = ?2, university = ?3, department = ?4,
             country = ?5, academic_title = ?6
           WHERE user_id = ?1",
          rusqlite::params![
            id_str,
            name_cl,
            university_cl,
            department_cl,
            country_cl,
            title_cl,
          ],
        )?;
        Ok(())
      })
      .await;

    if let Err(e) = result {
      return Err(map_user_conflict(
        e,
        &name,
        university.as_deref().unwrap_or_default(),
        &current.email,
      ));
    }

    self.fetch_account(id).await?.ok_or(CoreError::NotFound(id))
  }
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  async fn add_review(&self, input: NewReview) -> CoreResult<Review> {
    let review = Review {
      id:           Uuid::new_v4(),
      professor_id: input.professor_id,
      student_id:   input.student_id,
      rating:       input.rating,
      semester:     input.semester,
      subject:      input.subject,
      comment:      input.comment,
      created_at:   Utc::now(),
    };

    let id_str = encode_uuid(review.id);
    let prof_str = encode_uuid(review.professor_id);
    let student_str = encode_uuid(review.student_id);
    let rating = review.rating as i64;
    let semester = review.semester.clone();
    let subject = review.subject.clone();
    let comment = review.comment.clone();
    let at_str = encode_dt(review.created_at);

    let inserted: bool = match self
      .conn
      .call(move |conn| {
        let exists: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1 AND role = 'professor'",
            rusqlite::params![prof_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !exists {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO reviews (
             review_id, professor_id, student_id, rating, semester, subject,
             comment, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            prof_str,
            student_str,
            rating,
            semester,
            subject,
            comment,
            at_str,
          ],
        )?;
        Ok(true)
      })
      .await
    {
      Ok(b) => b,
      Err(e) => {
        if constraint_message(&e)
          .is_some_and(|m| m.contains("reviews.professor_id"))
        {
          return Err(CoreError::AlreadyReviewed);
        }
        return Err(Error::Database(e).into());
      }
    };

    if !inserted {
      return Err(CoreError::NotFound(review.professor_id));
    }

    Ok(review)
  }

  async fn reviews_for_professor(
    &self,
    professor_id: Uuid,
  ) -> CoreResult<Vec<ReviewWithAuthor>> {
    let prof_str = encode_uuid(professor_id);

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT r.review_id, r.professor_id, r.student_id, r.rating,
                  r.semester, r.subject, r.comment, r.created_at, u.name
           FROM reviews r
           JOIN users u ON u.user_id = r.student_id
           WHERE r.professor_id = ?1
           ORDER BY r.created_at DESC",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![prof_str], raw_review)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    raws
      .into_iter()
      .map(|r| r.into_review().map_err(CoreError::from))
      .collect()
  }

  async fn average_rating(&self, professor_id: Uuid) -> CoreResult<Option<f64>> {
    let prof_str = encode_uuid(professor_id);

    let avg: Option<f64> = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT AVG(rating) FROM reviews WHERE professor_id = ?1",
          rusqlite::params![prof_str],
          |row| row.get(0),
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(avg)
  }

  async fn review_breakdown(
    &self,
    professor_id: Uuid,
  ) -> CoreResult<ReviewBreakdown> {
    let prof_str = encode_uuid(professor_id);

    let breakdown = self
      .conn
      .call(move |conn| {
        let (total, average_rating) = conn.query_row(
          "SELECT COUNT(*), AVG(rating) FROM reviews WHERE professor_id = ?1",
          rusqlite::params![prof_str],
          |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<f64>>(1)?)),
        )?;

        // created_at is RFC 3339, so the first seven characters are YYYY-MM.
        let mut stmt = conn.prepare(
          "SELECT substr(created_at, 1, 7) AS month, COUNT(*)
           FROM reviews
           WHERE professor_id = ?1
           GROUP BY month
           ORDER BY month",
        )?;
        let monthly = stmt
          .query_map(rusqlite::params![prof_str], |row| {
            Ok(MonthlyReviewCount {
              month:   row.get(0)?,
              reviews: row.get::<_, i64>(1)? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ReviewBreakdown {
          total_reviews: total as u64,
          average_rating,
          monthly,
        })
      })
      .await
      .map_err(Error::Database)?;

    Ok(breakdown)
  }
}
