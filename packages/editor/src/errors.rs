//! Error types for the editor

use mailframe_schema::{BlockId, BlockType, DocumentError, SchemaError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Compile error: {0}")]
    Compile(#[from] mailframe_compiler_html::CompileError),

    #[error("Upload error: {0}")]
    Upload(#[from] crate::session::UploadError),

    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Block '{id}' is {expected}, cannot store a {found}")]
    TypeMismatch {
        id: BlockId,
        expected: BlockType,
        found: BlockType,
    },

    #[error("No block is selected")]
    NothingSelected,

    #[error("{block_type} blocks have no '{key}' style")]
    StyleKeyNotAllowed { block_type: BlockType, key: String },

    #[error("{block_type} blocks do not support {what}")]
    Unsupported {
        block_type: BlockType,
        what: &'static str,
    },
}
