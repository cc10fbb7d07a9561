use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;

use crate::Context;
use fivekit::runner::BackgroundTask;
use fivekit::{ScanReport, ui};

pub fn run(ctx: &Context, json: bool) -> Result<()> {
    let task = BackgroundTask::spawn(fivekit::scan_all);

    let spinner = if ctx.quiet || json {
        None
    } else {
        Some(ui::spinner("Scanning cache targets..."))
    };

    let report = task.wait()?;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize scan report")?
        );
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

pub fn print_report(report: &ScanReport) {
    ui::header("Cache Overview");

    for result in &report.results {
        if result.found {
            let size = result.size_bytes.unwrap_or(0);
            println!(
                "  {} {:<22} {}",
                "✓".green(),
                result.label.cyan(),
                ui::format_size(size)
            );
        } else {
            println!(
                "  {} {:<22} {}",
                "○".dimmed(),
                result.label.cyan(),
                "not found".dimmed()
            );
        }
    }

    println!();
    println!(
        "  {} {}",
        "Total reclaimable:".bold(),
        ui::format_size(report.total_bytes)
    );
}
