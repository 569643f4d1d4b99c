use crate::commands::{display_path, find_templates};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use mailframe_schema::{BlockError, Document, DocumentError};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Template file, directory or glob pattern
    #[arg(default_value = ".")]
    pub input: String,
}

/// What a single template check found
#[derive(Debug, Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
}

pub fn validate(args: ValidateArgs, cwd: &Path) -> Result<()> {
    let files = find_templates(cwd, &args.input)?;

    if files.is_empty() {
        println!("{}", "No templates found".yellow());
        return Ok(());
    }

    println!("{}", "Validating templates...".bright_blue().bold());

    let mut failed = 0;
    for file in &files {
        let report = check_file(file);
        let name = display_path(file, cwd);

        if report.errors.is_empty() {
            println!("  {} {}", "✓".green(), name);
        } else {
            failed += 1;
            println!("  {} {}", "✗".red(), name);
        }
        for error in &report.errors {
            println!("      {} {}", "error:".red(), error);
        }
        for warning in &report.warnings {
            println!("      {} {}", "warning:".yellow(), warning);
        }
    }

    println!();
    if failed == 0 {
        println!("{} {} template(s) valid", "✓".green(), files.len());
        Ok(())
    } else {
        Err(anyhow!("{} of {} template(s) invalid", failed, files.len()))
    }
}

fn check_file(path: &Path) -> Report {
    let mut report = Report::default();

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            report.errors.push(format!("cannot read file: {}", err));
            return report;
        }
    };

    match Document::from_json_str(&source) {
        Ok(document) => check_document(&document, &mut report),
        Err(DocumentError::InvalidBlocks(blocks)) => {
            for (id, err) in blocks {
                describe_block_error(&id, &err, &mut report);
            }
        }
        Err(err) => report.errors.push(err.to_string()),
    }
    report
}

fn describe_block_error(id: &str, err: &BlockError, report: &mut Report) {
    match err {
        BlockError::Schema(schema) => {
            for field in &schema.errors {
                report
                    .errors
                    .push(format!("[{}] {} {}", id, schema.block_type, field));
            }
        }
        other => report.errors.push(format!("[{}] {}", id, other)),
    }
}

fn check_document(document: &Document, report: &mut Report) {
    debug!(blocks = document.len(), "checking integrity");
    for issue in document.check_integrity() {
        report.errors.push(issue.to_string());
    }

    let orphans = document.orphans();
    if !orphans.is_empty() {
        report.warnings.push(format!(
            "{} orphaned block(s): {}",
            orphans.len(),
            orphans.join(", ")
        ));
    }
}
