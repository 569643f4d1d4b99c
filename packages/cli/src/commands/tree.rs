use crate::commands::load_template;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mailframe_editor::{render, EditorStore};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Template file
    pub template: PathBuf,

    /// Block to start from (overrides config)
    #[arg(long)]
    pub root: Option<String>,
}

pub fn tree(args: TreeArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let document = load_template(&cwd.join(&args.template))?;
    let root = args.root.as_deref().unwrap_or(&config.root_block_id);

    let store = EditorStore::new(document);
    let node = render(&store, root);

    for line in node.outline().lines() {
        if line.trim_start().starts_with('<') {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }

    let placeholders = node.placeholder_count();
    let orphans = store.document().orphans().len();
    println!();
    println!(
        "{} block(s), {} placeholder(s), {} orphan(s)",
        store.document().len(),
        if placeholders > 0 {
            placeholders.to_string().red()
        } else {
            placeholders.to_string().normal()
        },
        orphans
    );
    Ok(())
}
