//! mod-deployer - deploys mod archives into an extension directory.
//!
//! Resolves mod sources, removes older copies of the same extensions from the
//! target directory and copies (or remaps) the new archives into it.

use mod_deployer::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
            1
        }
    };

    process::exit(exit_code);
}
