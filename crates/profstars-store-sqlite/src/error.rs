//! Error type for `profstars-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {field}: {value:?}")]
  UnknownEnum {
    field: &'static str,
    value: String,
  },

  /// A row that violates the schema's expectations, e.g. a professor row
  /// without a university.
  #[error("corrupt row: {0}")]
  Corrupt(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for profstars_core::Error {
  fn from(e: Error) -> Self { profstars_core::Error::store(e) }
}
