//! `rampart version`

use anyhow::{Context, Result};

/// Print the CLI version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    if json {
        let out = serde_json::json!({
            "name": "rampart",
            "version": version,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("JSON serialization")?
        );
    } else {
        println!("rampart {version}");
    }
    Ok(())
}
