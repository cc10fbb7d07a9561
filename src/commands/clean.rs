use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use dialoguer::Confirm;

use crate::Context;
use fivekit::runner::BackgroundTask;
use fivekit::ui;

pub fn run(ctx: &Context, dry_run: bool, yes: bool, json: bool) -> Result<()> {
    // Estimate first so the user knows what they are agreeing to, and so
    // we can report how much space the clean reclaimed.
    let estimate_task = BackgroundTask::spawn(fivekit::scan_all);
    let spinner = if ctx.quiet || json {
        None
    } else {
        Some(ui::spinner("Scanning cache targets..."))
    };
    let estimate = estimate_task.wait()?;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    if !json {
        super::scan::print_report(&estimate);
        println!();
    }

    if dry_run {
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&estimate)
                    .context("Failed to serialize scan report")?
            );
        } else {
            ui::warn("Dry run - no changes made");
            println!(
                "  Would reclaim up to {}",
                ui::format_size(estimate.total_bytes).bold()
            );
        }
        return Ok(());
    }

    if estimate.total_bytes == 0 && estimate.results.iter().all(|r| !r.found) {
        if !json {
            ui::info("Nothing to clean.");
        }
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete the contents of these locations?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!();
            println!("  {} Aborted", "✗".red());
            return Ok(());
        }
    }

    let clean_task = BackgroundTask::spawn(fivekit::clean_all);
    let spinner = if ctx.quiet || json {
        None
    } else {
        Some(ui::spinner("Cleaning..."))
    };
    let report = clean_task.wait()?;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize clean report")?
        );
        return Ok(());
    }

    ui::header("Cleaning Results");
    for outcome in &report.outcomes {
        if outcome.found {
            println!(
                "  {} {:<22} {} files removed",
                "✓".green(),
                outcome.label.cyan(),
                outcome.files_removed
            );
        } else {
            println!(
                "  {} {:<22} {}",
                "○".dimmed(),
                outcome.label.cyan(),
                "nothing to clean".dimmed()
            );
        }
    }

    println!();
    ui::success(&format!(
        "Removed {} files, reclaiming about {}",
        report.total_files_removed(),
        ui::format_size(estimate.total_bytes)
    ));

    Ok(())
}
