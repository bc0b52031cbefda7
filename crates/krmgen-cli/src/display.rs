//! Display formatting for CLI output

use console::style;
use krmgen_codegen::RunSummary;
use krmgen_core::RegisteredKind;

use crate::error::Result;

/// Print the run summary as a table
pub fn print_summary(summary: &RunSummary) {
    println!(
        "{} Read {} file(s), {} document(s)",
        style("→").blue(),
        summary.files_read,
        summary.documents
    );

    if !summary.kinds.is_empty() {
        let width = summary
            .kinds
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("KIND".len());
        println!();
        println!(
            "  {:<width$}  {:>9}  {:>7}  {}",
            style("KIND").bold(),
            style("GENERATED").bold(),
            style("SKIPPED").bold(),
            style("SCHEMA").bold(),
        );
        for (kind, counts) in &summary.kinds {
            let schema = if counts.typed {
                style("typed").green()
            } else {
                style("unstructured").cyan()
            };
            println!(
                "  {:<width$}  {:>9}  {:>7}  {}",
                kind, counts.generated, counts.skipped, schema
            );
        }
        println!();
    }

    for file in &summary.unreadable_files {
        println!(
            "  {} {}: {}",
            style("✗").red(),
            style(&file.file).bold(),
            file.reason
        );
    }
    if !summary.skipped.is_empty() {
        println!(
            "  {} {} document(s) skipped ({} unclassified)",
            style("⚠").yellow(),
            summary.skipped.len(),
            summary.unclassified()
        );
        for doc in &summary.skipped {
            println!(
                "    {} {}#{} (line {}): {}",
                style("✗").red(),
                doc.file,
                doc.index,
                doc.line,
                doc.reason
            );
        }
    }
    for warning in &summary.warnings {
        println!(
            "  {} {}#{} {}: {}",
            style("⚠").yellow(),
            warning.file,
            warning.index,
            warning.kind,
            warning.message
        );
    }

    match &summary.output_dir {
        Some(dir) => println!(
            "{} {} in {}",
            style("✓").green().bold(),
            summary.success_message(),
            dir.display()
        ),
        None => println!(
            "{} {} (dry run, nothing written)",
            style("✓").green().bold(),
            summary.success_message()
        ),
    }
}

/// Print the run summary as JSON
pub fn print_json(summary: &RunSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Print registered kinds as a table
pub fn print_kinds(kinds: &[RegisteredKind]) {
    let width = kinds
        .iter()
        .map(|k| k.gvk.kind.len())
        .max()
        .unwrap_or(0)
        .max("KIND".len());
    println!(
        "{:<width$}  {:<30}  {}",
        style("KIND").bold(),
        style("API VERSION").bold(),
        style("SCOPE").bold()
    );
    for kind in kinds {
        let scope = if kind.namespaced {
            "Namespaced"
        } else {
            "Cluster"
        };
        println!("{:<width$}  {:<30}  {}", kind.gvk.kind, kind.gvk.api_version(), scope);
    }
}
