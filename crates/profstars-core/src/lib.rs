//! Core types and trait definitions for the ProfStars professor directory.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod account;
pub mod approval;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod record;
pub mod review;
pub mod store;
pub mod visibility;

pub use error::{Error, Result};
