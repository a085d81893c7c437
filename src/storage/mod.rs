//! Flat record storage for gymstore
//!
//! One CSV file holds every table. Each physical row starts with its table
//! tag; the first row of a freshly created file is a `Table, Field x 10`
//! header.
//!
//! # Guarantees
//!
//! - Appends are flushed and synced before returning
//! - Update and delete rewrite the file through a temporary file and an
//!   atomic rename, so a failed rewrite leaves the previous contents
//! - Read failures surface as errors, never as empty results

mod errors;
mod record;
mod store;

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use record::Record;
pub use store::{FlatStore, RewriteSummary, Scan};
