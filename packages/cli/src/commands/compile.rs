use crate::commands::{display_path, find_templates, load_template};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use mailframe_compiler_html::{compile_to_html, prepare_for_reader, ReaderMode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Template file, directory or glob pattern
    #[arg(default_value = ".")]
    pub input: String,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Use preview conversion (overrides config)
    #[arg(long)]
    pub preview: bool,

    /// Emit HTML without indentation
    #[arg(long)]
    pub compact: bool,

    /// Block to start from (overrides config)
    #[arg(long)]
    pub root: Option<String>,
}

pub fn compile(args: CompileArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let files = find_templates(cwd, &args.input)?;

    if files.is_empty() {
        println!("{}", "No templates found".yellow());
        return Ok(());
    }

    let base = input_base(cwd, &args.input);
    if !args.stdout {
        println!("{}", "Compiling templates...".bright_blue().bold());
    }

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        match compile_file(file, &base, &args, &config, cwd) {
            Ok(output) => {
                success_count += 1;
                if !args.stdout {
                    println!("  {} {} → {}", "✓".green(), display_path(file, cwd), output);
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    display_path(file, cwd),
                    e.to_string().red()
                );
            }
        }
    }

    if args.stdout {
        return if error_count == 0 {
            Ok(())
        } else {
            Err(anyhow!("{} template(s) failed to compile", error_count))
        };
    }

    println!();
    if error_count == 0 {
        println!("{} Compiled {} template(s)", "✓".green(), success_count);
        Ok(())
    } else {
        Err(anyhow!(
            "Compiled {} template(s), {} failed",
            success_count,
            error_count
        ))
    }
}

/// Directory output paths are made relative to
fn input_base(cwd: &Path, input: &str) -> PathBuf {
    let path = cwd.join(input);
    if path.is_dir() {
        path
    } else {
        path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf())
    }
}

fn compile_file(
    file: &Path,
    base: &Path,
    args: &CompileArgs,
    config: &Config,
    cwd: &Path,
) -> Result<String> {
    let document = load_template(file)?;

    let mode = if args.preview {
        ReaderMode::Preview
    } else {
        config.reader_mode()
    };
    let mut options = config.compile_options();
    if args.compact {
        options.pretty = false;
    }
    let root = args.root.as_deref().unwrap_or(&config.root_block_id);

    debug!(file = %file.display(), ?mode, root, "compiling template");
    let ready = prepare_for_reader(&document, mode);
    let html = compile_to_html(&ready, root, &options)?;

    if args.stdout {
        println!("{}", html);
        return Ok("stdout".to_string());
    }

    let out_dir = match &args.out_dir {
        Some(out) => cwd.join(out),
        None => config.get_out_dir(cwd),
    };
    let relative = file.strip_prefix(base).unwrap_or(file);
    let output_file = out_dir.join(relative).with_extension("html");

    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, html)?;
    info!(output = %output_file.display(), "wrote html");

    Ok(display_path(&output_file, cwd))
}
