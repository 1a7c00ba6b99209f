#![forbid(unsafe_code)]
#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

//! Thin entrypoint delegating to [`healthpoints_cli::run`].

use std::process;

#[tokio::main]
async fn main() {
    let exit_code = healthpoints_cli::run().await;
    if exit_code != 0 {
        process::exit(exit_code);
    }
}
