//! gymstore - a flat-file record store for gym membership data
//!
//! Members, attendance, payments, appointments, staff, locations and workout
//! zones share one CSV file. Rows are validated against a static schema
//! before they are written.

pub mod api;
pub mod cli;
pub mod schema;
pub mod storage;
pub mod validation;
