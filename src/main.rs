//! GitLink CLI entry point
//!
//! Parses arguments, runs the command and maps the result to an exit code:
//! `0` when every entry resolved, `1` when any entry failed or the run could
//! not start.

use anyhow::Result;
use clap::Parser;
use gitlink_cli::cli;
use gitlink_cli::core::user_friendly_error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
