//! SQL schema for the ProfStars SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per account; professor rows double as professor records.
CREATE TABLE IF NOT EXISTS users (
    user_id        TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    email          TEXT NOT NULL COLLATE NOCASE UNIQUE,
    password_hash  TEXT,            -- argon2 PHC; NULL for submitted candidates
    role           TEXT NOT NULL,   -- 'student' | 'professor' | 'admin'
    approval_state TEXT NOT NULL,   -- 'pending' | 'approved' | 'rejected'
    is_approved    INTEGER NOT NULL,
    university     TEXT,
    department     TEXT,
    country        TEXT,
    academic_title TEXT,
    submitted_by   TEXT REFERENCES users(user_id),
    created_at     TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    CHECK (is_approved = (approval_state = 'approved'))
);

-- The identity invariant: one professor per case-insensitive
-- (name, university) pair. Creation races resolve here, not in-process.
CREATE UNIQUE INDEX IF NOT EXISTS professors_identity_idx
    ON users (lower(name), lower(university))
    WHERE role = 'professor';

CREATE TABLE IF NOT EXISTS reviews (
    review_id    TEXT PRIMARY KEY,
    professor_id TEXT NOT NULL REFERENCES users(user_id),
    student_id   TEXT NOT NULL REFERENCES users(user_id),
    rating       INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    semester     TEXT NOT NULL,
    subject      TEXT NOT NULL,
    comment      TEXT,
    created_at   TEXT NOT NULL,
    UNIQUE (professor_id, student_id)
);

CREATE INDEX IF NOT EXISTS users_role_idx        ON users(role);
CREATE INDEX IF NOT EXISTS users_created_idx     ON users(created_at);
CREATE INDEX IF NOT EXISTS reviews_professor_idx ON reviews(professor_id);

PRAGMA user_version = 1;
";
