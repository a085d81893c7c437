//! API layer for gymstore
//!
//! The operations the management front end invokes, built on the record
//! store and the validator.
//!
//! # Supported Operations
//!
//! - add / update a row of any table
//! - delete a member with its linked rows (appointments are kept)
//! - search a member and collect its rows
//! - attendance per member, one row per day
//! - member summary and join-date chart series
//! - foreign key options for selection lists

mod clock;
mod errors;
mod handler;
mod views;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ApiError, ApiResult};
pub use handler::GymHandler;
pub use views::{DeleteSummary, JoinDatePoint, MemberSnapshot};
