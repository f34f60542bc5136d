//! SQLite backend for the ProfStars record store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.
//!
//! The core invariants live in the schema rather than in application code: a
//! partial unique index over `(lower(name), lower(university))` for professor
//! rows carries the identity invariant, and a CHECK constraint ties
//! `is_approved` to `approval_state` so the pair can never drift.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
