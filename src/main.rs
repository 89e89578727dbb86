//! Rampart CLI - idempotent one-shot hardening for Linux hosts

use clap::Parser;

use rampart_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
