//! The `config` command.

use redline_core::Config;
use std::path::PathBuf;

/// Print the config sources and the effective configuration.
pub fn show_config(config: &Config, sources: &[PathBuf]) -> anyhow::Result<()> {
    println!("Configuration sources:");
    if sources.is_empty() {
        println!("  (none)");
    } else {
        for source in sources {
            println!("  {}", source.display());
        }
    }
    println!();

    match config.documents_root() {
        Ok(root) => println!("Documents: {}", root.display()),
        Err(e) => println!("Documents: ({e})"),
    }
    println!();

    println!("Current configuration:");
    println!("{}", serde_json::to_string_pretty(config)?);

    Ok(())
}
