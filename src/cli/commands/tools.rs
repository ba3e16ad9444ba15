//! External tool check.

use console::style;

use crate::cli::icons::info;
use crate::documents::TextExtractor;

/// Report whether the Poppler tools are on PATH.
pub fn cmd_check_tools() -> anyhow::Result<()> {
    println!("\n{}", style("PDF Tool Status").bold());
    println!("{}", "-".repeat(40));

    let tools = TextExtractor::check_tools();
    let mut all_found = true;
    for (tool, available) in &tools {
        let status = if *available {
            style("✓ found").green()
        } else {
            all_found = false;
            style("✗ not found").red()
        };
        println!("  {:<15} {}", tool, status);
    }

    println!("  {:<15} {}", "lopdf", style("✓ built in").green());

    if !all_found {
        println!(
            "\n{} The native backend works without them; install poppler-utils to use --pdf-backend pdftotext",
            info()
        );
    }
    Ok(())
}
