mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{compile, init, tree, validate, CompileArgs, InitArgs, TreeArgs, ValidateArgs};
use config::Config;
use tracing_subscriber::EnvFilter;

/// Mailframe CLI - validate and compile block email templates
#[derive(Parser, Debug)]
#[command(name = "mailframe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG and the config's logLevel take precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Mailframe project
    Init(InitArgs),

    /// Check templates against the block schemas and tree rules
    Validate(ValidateArgs),

    /// Compile templates to email HTML
    Compile(CompileArgs),

    /// Print the block tree of a template
    Tree(TreeArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd)?;
    init_tracing(cli.verbose, &config);

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Validate(args) => validate(args, &cwd),
        Command::Compile(args) => compile(args, &cwd),
        Command::Tree(args) => tree(args, &cwd),
    }
}

fn init_tracing(verbose: bool, config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config
            .log_level
            .as_deref()
            .unwrap_or(if verbose { "debug" } else { "warn" });
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
