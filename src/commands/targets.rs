use anyhow::Result;
use colored::Colorize;

use crate::Context;
use fivekit::{paths, ui};

pub fn run(ctx: &Context) -> Result<()> {
    ui::header("Registered Cache Targets");

    for target in fivekit::list_targets() {
        let resolved = paths::resolve(&target.template);
        let marker = if resolved.exists() {
            "✓".green()
        } else {
            "○".dimmed()
        };
        println!("  {} {}", marker, target.label.cyan().bold());
        if ctx.verbose > 0 {
            println!("      template: {}", target.template.dimmed());
        }
        println!("      resolved: {}", resolved.display());
        if target.recreate_root {
            println!("      {}", "recreated empty after cleaning".dimmed());
        }
    }

    Ok(())
}
