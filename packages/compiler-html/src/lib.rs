//! # Mailframe HTML Compiler
//!
//! Turns a block `Document` into table-based HTML that survives email
//! clients.
//!
//! Compilation runs in two steps: [`prepare_for_reader`] rewrites blocks the
//! static renderer cannot draw faithfully, then [`compile_to_html`] walks the
//! tree from the root id and emits markup with inline styles only.
//!
//! ```rust,ignore
//! use mailframe_compiler_html::{compile_to_html, prepare_for_reader, CompileOptions, ReaderMode};
//!
//! let ready = prepare_for_reader(&document, ReaderMode::Export);
//! let html = compile_to_html(&ready, "root", &CompileOptions::default())?;
//! ```

mod compiler;
mod css;
mod reader;

pub use compiler::{compile_to_html, CompileError, CompileOptions};
pub use css::Declarations;
pub use reader::{button_html, prepare_for_reader, ReaderMode};

#[cfg(test)]
mod tests;
