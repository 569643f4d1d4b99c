pub mod compile;
pub mod init;
pub mod tree;
pub mod validate;

pub use compile::{compile, CompileArgs};
pub use init::{init, InitArgs};
pub use tree::{tree, TreeArgs};
pub use validate::{validate, ValidateArgs};

use crate::config::DEFAULT_CONFIG_NAME;
use anyhow::{anyhow, Context, Result};
use mailframe_schema::Document;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand an input argument into template files. Accepts a file, a
/// directory (searched recursively for `.json`) or a glob pattern.
pub fn find_templates(cwd: &Path, input: &str) -> Result<Vec<PathBuf>> {
    let path = cwd.join(input);

    if path.is_file() {
        return Ok(vec![path]);
    }

    let mut files = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(&path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if is_template(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
        return Ok(files);
    }

    let pattern = path.to_string_lossy().to_string();
    for entry in glob::glob(&pattern).with_context(|| format!("Invalid pattern: {}", input))? {
        let file = entry?;
        if file.is_file() {
            files.push(file);
        }
    }

    if files.is_empty() {
        return Err(anyhow!("No templates match: {}", input));
    }
    Ok(files)
}

fn is_template(path: &Path) -> bool {
    path.is_file()
        && path.extension().and_then(|s| s.to_str()) == Some("json")
        && path.file_name().and_then(|s| s.to_str()) != Some(DEFAULT_CONFIG_NAME)
}

/// Read and decode a template, validating every block
pub fn load_template(path: &Path) -> Result<Document> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    Ok(Document::from_json_str(&source)?)
}

/// Path shown to the user, relative to `base` when possible
pub fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}
