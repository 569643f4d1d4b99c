//! # Mailframe Schema
//!
//! Block model and schema layer for Mailframe email templates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: typed blocks + validation           │
//! │  - Closed `Block` sum over every type       │
//! │  - Declarative per-type field tables        │
//! │  - Ordered `Document` map rooted at "root"  │
//! │  - Uniform child-list access                │
//! └─────────────────────────────────────────────┘
//!            ↓                       ↓
//! ┌──────────────────────┐  ┌──────────────────────┐
//! │ editor: store,       │  │ compiler-html:       │
//! │ mutations, panels    │→ │ Document → email HTML│
//! └──────────────────────┘  └──────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Decoded means valid**: a `Block` can only be built from JSON through
//!    the validator
//! 2. **Every error at once**: validation reports all violated paths
//! 3. **Defaults at read time**: validation never fills in missing values
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mailframe_schema::{validate, BlockType, Document};
//!
//! let block = validate(BlockType::Button, &serde_json::json!({
//!     "props": {"text": "Buy", "variant": "bordered"}
//! }))?;
//!
//! let doc = Document::from_json_str(&std::fs::read_to_string("template.json")?)?;
//! for issue in doc.check_integrity() {
//!     println!("{issue}");
//! }
//! ```

mod block;
mod children;
pub mod defaults;
mod document;
mod error;
mod props;
mod style;
mod validate;

pub use block::{Block, BlockData, BlockType, EmailLayoutData};
pub use children::HasChildren;
pub use document::{BlockId, ChildLocation, Document, IntegrityIssue, ROOT_BLOCK_ID};
pub use error::{BlockError, DocumentError, FieldError, FieldIssue, SchemaError};
pub use props::{
    AvatarProps, AvatarShape, ButtonProps, ButtonSize, ButtonVariant, Column,
    ColumnsContainerProps, ContainerProps, DividerProps, HeadingLevel, HeadingProps, HtmlProps,
    ImageProps, SpacerProps, TextProps, VerticalAlign, COLUMN_SLOTS,
};
pub use style::{BlockStyle, FontFamily, FontWeight, Padding, TextAlign};
pub use validate::{schema_for, style_keys, validate, validate_block, FieldKind, FieldSpec};
