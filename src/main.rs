//! dupscan - size-first, content-second duplicate file scanner
//!
//! Entry point for the dupscan CLI application.

use clap::Parser;
use dupscan::{
    cli::Cli,
    error::{error_kind, ExitCode},
};

fn main() {
    // Usage errors exit with code 2 inside clap
    let cli = Cli::parse();

    match dupscan::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!(
                "[{}] Error ({}): {:#}",
                exit_code.code_prefix(),
                error_kind(&err),
                err
            );
            std::process::exit(exit_code.as_i32());
        }
    }
}
