//! One-shot `asintel extract` command.

use std::path::Path;

use console::style;

use asintel_core::extract::{extract, ExtractionInput};

/// Extract ASINs from a CSV file and print the resulting batch.
pub async fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;

    let batch = match extract(&ExtractionInput::FileContents(contents)) {
        Ok(batch) => batch,
        Err(err) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "error": err.to_string() })
                );
            } else {
                eprintln!("  {} {err}", style("!").red().bold());
            }
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} ASIN(s) extracted from {}",
        style("✓").green().bold(),
        batch.len(),
        style(path.display()).cyan()
    );
    if batch.rejected_rows() > 0 {
        println!(
            "  {} {} non-conforming row(s) skipped",
            style("!").yellow().bold(),
            batch.rejected_rows()
        );
    }
    println!();
    for asin in batch.identifiers() {
        println!("  {asin}");
    }
    println!();

    Ok(())
}
