//! xcframework_builder - repackages a fat-framework CocoaPods pod as xcframeworks.
//!
//! Exit codes identify the failing stage; see `BuilderError::exit_code`.

use std::process;

use xcframework_builder::cli;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("Hint: {}", hint);
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
