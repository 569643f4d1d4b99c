//! Error types for the schema layer

use crate::block::BlockType;
use crate::document::BlockId;
use std::fmt;
use thiserror::Error;

/// What went wrong at a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldIssue {
    Required,
    WrongType { expected: &'static str },
    NotInEnum { allowed: Vec<String> },
    WrongLength { expected: usize, found: usize },
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Required => f.write_str("required"),
            FieldIssue::WrongType { expected } => write!(f, "expected {}", expected),
            FieldIssue::NotInEnum { allowed } => write!(f, "expected one of {}", allowed.join(" | ")),
            FieldIssue::WrongLength { expected, found } => {
                write!(f, "expected {} items, found {}", expected, found)
            }
        }
    }
}

/// A violation at a dotted path inside a block's `data`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub path: String,
    pub issue: FieldIssue,
}

impl FieldError {
    pub fn new(path: impl Into<String>, issue: FieldIssue) -> Self {
        Self {
            path: path.into(),
            issue,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(data): {}", self.issue)
        } else {
            write!(f, "{}: {}", self.path, self.issue)
        }
    }
}

/// Validation failure listing every violated field
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid {block_type} data: {}", join_errors(.errors))]
pub struct SchemaError {
    pub block_type: BlockType,
    pub errors: Vec<FieldError>,
}

impl SchemaError {
    /// Whether any error sits exactly at `path`
    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure decoding one `{type, data}` entry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlockError {
    #[error("block is not a JSON object")]
    NotAnObject,

    #[error("block has no string `type`")]
    MissingType,

    #[error("unknown block type '{0}'")]
    UnknownType(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Failure loading a whole document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("{}", describe_blocks(.0))]
    InvalidBlocks(Vec<(BlockId, BlockError)>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe_blocks(blocks: &[(BlockId, BlockError)]) -> String {
    let details = blocks
        .iter()
        .map(|(id, err)| format!("[{}] {}", id, err))
        .collect::<Vec<_>>()
        .join("; ");
    format!("{} invalid block(s): {}", blocks.len(), details)
}
