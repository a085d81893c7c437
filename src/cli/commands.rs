//! CLI command implementations
//!
//! Each command opens the record file, runs one handler operation and
//! writes the result. Nothing is kept between invocations.

use serde_json::{json, Value};

use crate::api::GymHandler;
use crate::schema::{all_schemas, schema_for};
use crate::storage::FlatStore;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::CliResult;
use super::io::write_response;
use super::logging::init_logging;

/// Main CLI entry point
///
/// Parses arguments, loads configuration, sets up logging and dispatches.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::resolve(&cli.config, cli.data_file.as_deref())?;
    init_logging(&config)?;
    let data = run_command(&config, cli.command)?;
    write_response(data)
}

/// Run one command and return its response payload
pub fn run_command(config: &Config, cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Init => init(config),
        Command::Schema { table } => {
            let schemas: Vec<_> = match table {
                Some(t) => vec![schema_for(t)],
                None => all_schemas().collect(),
            };
            Ok(serde_json::to_value(schemas)?)
        }
        Command::Add { table, values } => {
            let record = open_handler(config)?.add_record(table, values)?;
            Ok(serde_json::to_value(record)?)
        }
        Command::Update { table, key, values } => {
            let replaced = open_handler(config)?.update_record(table, &key, values)?;
            Ok(json!({ "replaced": replaced }))
        }
        Command::DeleteMember { member_id } => {
            let summary = open_handler(config)?.delete_member(&member_id)?;
            Ok(serde_json::to_value(summary)?)
        }
        Command::List { table } => {
            let rows = open_handler(config)?.list(table)?;
            Ok(serde_json::to_value(rows)?)
        }
        Command::Options { table } => {
            let options = open_handler(config)?.foreign_key_options(table)?;
            Ok(json!(options))
        }
        Command::Search { term } => match open_handler(config)?.search_member(&term)? {
            Some(snapshot) => Ok(json!({ "found": true, "member": snapshot })),
            None => Ok(json!({ "found": false })),
        },
        Command::Attendance { member_id } => {
            let rows = open_handler(config)?.attendance(&member_id)?;
            Ok(serde_json::to_value(rows)?)
        }
        Command::Summary => {
            let rows = open_handler(config)?.members_summary()?;
            Ok(serde_json::to_value(rows)?)
        }
        Command::Chart { member } => {
            let series = open_handler(config)?.join_date_series(member.as_deref())?;
            Ok(serde_json::to_value(series)?)
        }
    }
}

/// Create the record file if it does not exist yet
fn init(config: &Config) -> CliResult<Value> {
    let path = config.data_path();
    let existed = path.exists();
    FlatStore::open(path)?;
    Ok(json!({
        "initialized": true,
        "created": !existed,
        "path": path.display().to_string(),
    }))
}

fn open_handler(config: &Config) -> CliResult<GymHandler> {
    let store = FlatStore::open(config.data_path())?;
    Ok(GymHandler::new(store).with_policy(config.policy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        Config {
            data_file: dir.path().join("gym.csv"),
            ..Config::default()
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_init_reports_creation_once() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let first = run_command(&config, Command::Init).unwrap();
        let second = run_command(&config, Command::Init).unwrap();

        assert_eq!(first["created"], json!(true));
        assert_eq!(second["created"], json!(false));
        assert!(PathBuf::from(first["path"].as_str().unwrap()).exists());
    }

    #[test]
    fn test_add_then_options() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        run_command(
            &config,
            Command::Add {
                table: crate::schema::Table::Staff,
                values: strings(&["S1", "Ana", "Trainer", "Z1"]),
            },
        )
        .unwrap();

        let options = run_command(
            &config,
            Command::Options {
                table: crate::schema::Table::Staff,
            },
        )
        .unwrap();
        assert_eq!(options, json!(["S1"]));
    }

    #[test]
    fn test_search_not_found() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let out = run_command(
            &config,
            Command::Search {
                term: "M1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(out, json!({ "found": false }));
    }

    #[test]
    fn test_rejected_add_keeps_code() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let err = run_command(
            &config,
            Command::Add {
                table: crate::schema::Table::Attendance,
                values: strings(&["A1", "M99", "C1", "", "Present"]),
            },
        )
        .unwrap_err();
        assert_eq!(err.code_str(), "GYM_DANGLING_REFERENCE");
    }

    #[test]
    fn test_schema_lists_all_tables() {
        let dir = TempDir::new().unwrap();
        let out = run_command(&config_in(&dir), Command::Schema { table: None }).unwrap();
        assert_eq!(out.as_array().unwrap().len(), 7);
        assert_eq!(out[0]["table"], json!("Member"));
        assert_eq!(out[1]["fields"][1]["kind"], json!("foreign_key"));
        assert_eq!(out[1]["fields"][1]["target"], json!("Member"));
    }
}
