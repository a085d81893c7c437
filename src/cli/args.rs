//! CLI argument definitions using clap
//!
//! Commands:
//! - gymstore init
//! - gymstore schema [TABLE]
//! - gymstore add TABLE VALUES...
//! - gymstore update TABLE KEY VALUES...
//! - gymstore delete-member ID
//! - gymstore list TABLE
//! - gymstore options TABLE
//! - gymstore search TERM
//! - gymstore attendance ID
//! - gymstore summary
//! - gymstore chart [--member ID]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schema::Table;

/// gymstore - flat-file record store for gym membership data
#[derive(Parser, Debug)]
#[command(name = "gymstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./gymstore.json")]
    pub config: PathBuf,

    /// Record file, overriding the configured one
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the record file with its header
    Init,

    /// Show table declarations
    Schema {
        /// Only this table
        table: Option<Table>,
    },

    /// Add a row; values follow the table's field order
    Add {
        /// Target table
        table: Table,
        /// Field values in schema order
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Replace the row stored under KEY
    Update {
        /// Target table
        table: Table,
        /// Current key value
        key: String,
        /// Field values in schema order
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Delete a member and its linked rows (appointments are kept)
    DeleteMember {
        /// Member to delete
        member_id: String,
    },

    /// List every row of a table
    List {
        /// Table to list
        table: Table,
    },

    /// List key values selectable as references into a table
    Options {
        /// Referenced table
        table: Table,
    },

    /// Find a member and every row linked to it
    Search {
        /// Member id
        term: String,
    },

    /// Attendance of one member, one row per day
    Attendance {
        /// Member id
        member_id: String,
    },

    /// All member rows
    Summary,

    /// Join-date chart data
    Chart {
        /// Only this member
        #[arg(long)]
        member: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
