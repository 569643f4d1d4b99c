//! # Mailframe Editor
//!
//! Editing core for Mailframe email templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: typed blocks, validation, Document  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: store + structural mutations        │
//! │  - One synchronous store, subscribers       │
//! │  - Insert / move / delete as whole commits  │
//! │  - Render tree with placeholders            │
//! │  - Panels validate before committing        │
//! │  - Debounced inline content                 │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-html: Document → email HTML        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document is the source of truth**: render trees and HTML are derived
//! 2. **Atomic commits**: each structural mutation publishes exactly once
//! 3. **Validate at the edge**: panels reject malformed data, the store trusts
//!    its callers
//! 4. **Degrade, don't fail**: dangling ids render as placeholders
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailframe_editor::{EmailEditor, EditorOptions, InsertTarget, Mutation};
//! use mailframe_schema::{Block, BlockType, Document};
//!
//! let mut editor = EmailEditor::new(Document::default(), host, EditorOptions::default());
//!
//! let result = editor.apply(&Mutation::InsertBlock {
//!     target: InsertTarget::append("root"),
//!     block: Block::starter(BlockType::Text),
//! })?;
//!
//! editor.panel()?.set_text_color(editor.store_mut(), "#ff0000")?;
//! ```

mod content_editor;
mod debounce;
mod errors;
mod ids;
mod inspector;
mod mutations;
mod renderer;
mod session;
mod store;
mod toolbar;
mod view;

pub use content_editor::ContentEditor;
pub use debounce::{FieldDebouncer, DEFAULT_DEBOUNCE};
pub use errors::EditorError;
pub use ids::BlockIdGenerator;
pub use inspector::BlockPanel;
pub use mutations::{
    delete_block, insert_block, move_block, Direction, InsertPosition, InsertTarget, Mutation,
    MutationError, MutationResult,
};
pub use renderer::{
    render, BlockUpdater, BlockView, InsertPoint, PlaceholderReason, RenderItem, RenderNode,
};
pub use session::{ChangeEvent, EditorHost, EditorOptions, EmailEditor, FileUpload, UploadError};
pub use store::{EditorStore, StoreChange, StoreEvent, Subscriber, SubscriptionId};
pub use toolbar::{StyleControl, Supports};
pub use view::{MainTab, ScreenSize, ViewState};

// Re-export schema types for convenience
pub use mailframe_schema::{Block, BlockId, BlockType, Document, ROOT_BLOCK_ID};
