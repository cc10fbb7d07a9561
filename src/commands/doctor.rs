use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;

use crate::Context;
use fivekit::runner::BackgroundTask;
use fivekit::ui;

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let task = BackgroundTask::spawn(fivekit::run_diagnostics);

    let spinner = if ctx.quiet || json {
        None
    } else {
        Some(ui::spinner("Running health checks..."))
    };

    let report = task.wait()?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report)
                .context("Failed to serialize diagnostic report")?
        );
        return Ok(());
    }

    ui::header("FiveM Health Check");

    for check in &report.checks {
        if check.status {
            println!(
                "  {} {:<22} {}",
                "✓".green(),
                check.name,
                check.message.dimmed()
            );
        } else {
            println!("  {} {:<22} {}", "✗".red(), check.name, check.message);
        }
    }

    println!();
    if report.all_healthy() {
        ui::success("All systems healthy!");
    } else {
        let count = report.failed_count();
        let label = if count == 1 { "issue" } else { "issues" };
        ui::warn(&format!(
            "{count} {label} found. 'fivekit clean' can reclaim cache space."
        ));
    }

    Ok(())
}
