use mailframe_compiler_html::{CompileOptions, ReaderMode};
use mailframe_schema::ROOT_BLOCK_ID;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "mailframe.config.json";

/// Mailframe configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory compiled HTML is written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Indent the emitted HTML
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Compile with preview-mode reader conversion
    #[serde(default)]
    pub preview: bool,

    /// Tracing filter used when `RUST_LOG` is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Block the compiler starts from
    #[serde(default = "default_root_block_id")]
    pub root_block_id: String,
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_pretty() -> bool {
    true
}

fn default_root_block_id() -> String {
    ROOT_BLOCK_ID.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("{}: {}", config_path.display(), e))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to output directory
    pub fn get_out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.out_dir)
    }

    pub fn reader_mode(&self) -> ReaderMode {
        if self.preview {
            ReaderMode::Preview
        } else {
            ReaderMode::Export
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            pretty: self.pretty,
            ..CompileOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            pretty: default_pretty(),
            preview: false,
            log_level: None,
            root_block_id: default_root_block_id(),
        }
    }
}
