//! gymstore CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. On failure the error is
//! printed as a JSON error object and the process exits non-zero.

use gymstore::cli;

fn main() {
    if let Err(e) = cli::run() {
        let _ = cli::write_error(e.code_str(), e.message());
        std::process::exit(1);
    }
}
