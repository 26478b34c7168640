//! # PRISM Common Library
//!
//! Shared code for the PRISM profile tools:
//! - Record access by dot-delimited field path
//! - Signal extraction and rule-table inference of missing fields
//! - Trait canonicalization against a synonym table
//! - Corpus coverage analysis and outline reconciliation
//! - Corpus storage, report snapshots and the batch enrichment driver
//! - Configuration loading

pub mod canonicalize;
pub mod config;
pub mod corpus;
pub mod coverage;
pub mod driver;
pub mod error;
pub mod inference;
pub mod outline;
pub mod record;
pub mod report;
pub mod signal;

pub use error::{Error, Result};
pub use record::{FieldPath, Record};
