//! unitodo - TODO annotation tooling

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = unitodo::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
