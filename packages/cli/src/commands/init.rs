use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailframe_editor::{insert_block, BlockIdGenerator, InsertTarget};
use mailframe_schema::{Block, BlockType, Document, ROOT_BLOCK_ID};
use std::fs;
use std::path::Path;

pub const STARTER_TEMPLATE_NAME: &str = "template.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project directory
    #[arg(default_value = ".")]
    pub dir: String,

    /// Output directory written into the config
    #[arg(short, long, default_value = "dist")]
    pub out_dir: String,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let dir = cwd.join(&args.dir);
    let config_path = dir.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "!".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "Initializing Mailframe project...".bright_blue().bold());

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
        println!("  {} Created {}/", "✓".green(), args.dir);
    }

    let template_path = dir.join(STARTER_TEMPLATE_NAME);
    if !template_path.exists() || args.force {
        let template = starter_template()?;
        fs::write(&template_path, serde_json::to_string_pretty(&template)?)?;
        println!("  {} Created {}", "✓".green(), STARTER_TEMPLATE_NAME);
    }

    let config = Config {
        out_dir: args.out_dir.clone(),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", STARTER_TEMPLATE_NAME);
    println!("  2. Run: mailframe compile");
    println!("  3. Check output in {}/", args.out_dir);

    Ok(())
}

/// Root layout holding a heading, a paragraph and a button
fn starter_template() -> Result<Document> {
    let mut ids = BlockIdGenerator::default();
    let mut document = Document::default();
    for block_type in [BlockType::Heading, BlockType::Text, BlockType::Button] {
        let (next, _) = insert_block(
            &document,
            &InsertTarget::append(ROOT_BLOCK_ID),
            Block::starter(block_type),
            &mut ids,
        )?;
        document = next;
    }
    Ok(document)
}
