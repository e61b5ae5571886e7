//! The `check` command.
//!
//! A fresh process has no baselines, so this mostly answers "does redline
//! see this file, and where": every document comes back untracked, or
//! missing if it does not exist.

use redline_core::{Config, Instance};
use std::path::PathBuf;

/// Print the status of each document.
pub async fn run_check(
    config: Config,
    sources: Vec<PathBuf>,
    paths: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let instance = Instance::from_config(config, sources)?;
    let ctx = instance.context();

    let mut reports = Vec::with_capacity(paths.len());
    let mut failures = 0usize;
    for input in paths {
        let report = match ctx.resolve(input) {
            Ok(identity) => ctx.engine.status(&identity).await.map_err(anyhow::Error::from),
            Err(e) => Err(e.into()),
        };
        match report {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("{input}: {e}");
                failures += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}", report.render());
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} document(s) could not be checked", paths.len());
    }
    Ok(())
}
