//! # Editor Session
//!
//! Entry point a host application embeds.
//!
//! An `EmailEditor` owns the store, the id generator and the pending content
//! edits. It subscribes to its own store so that every document change is
//! compiled to HTML and handed to the host together with the design, followed
//! by a snapshot request.

use crate::content_editor::ContentEditor;
use crate::debounce::DEFAULT_DEBOUNCE;
use crate::errors::EditorError;
use crate::ids::BlockIdGenerator;
use crate::inspector::BlockPanel;
use crate::mutations::{Mutation, MutationResult};
use crate::renderer::{render, RenderNode};
use crate::store::{EditorStore, StoreChange, SubscriptionId};
use mailframe_compiler_html::{compile_to_html, prepare_for_reader, CompileOptions, ReaderMode};
use mailframe_schema::{BlockId, BlockType, Document, ROOT_BLOCK_ID};
use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

/// Payload of a change notification
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent<'a> {
    pub html: String,
    pub design: &'a Document,
}

/// File picked by the user for an image or avatar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("upload failed: {0}")]
    Failed(String),
}

/// Callbacks supplied by the embedding application
pub trait EditorHost {
    /// Called after every document change with the exported HTML
    fn on_change(&mut self, event: &ChangeEvent<'_>);

    /// Store the file somewhere reachable and return its public URL
    fn on_file_upload(&mut self, file: &FileUpload) -> Result<String, UploadError>;

    /// Called after `on_change`; hosts capture thumbnails here
    fn on_snapshot(&mut self, _design: &Document) {}
}

#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Quiet period before inline content is committed
    pub debounce: Duration,
    pub compile: CompileOptions,
    pub ids: BlockIdGenerator,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            compile: CompileOptions::default(),
            ids: BlockIdGenerator::default(),
        }
    }
}

pub struct EmailEditor<H: EditorHost + 'static> {
    store: EditorStore,
    host: Rc<RefCell<H>>,
    ids: BlockIdGenerator,
    content: ContentEditor,
    compile: CompileOptions,
    subscription: SubscriptionId,
}

impl<H: EditorHost + 'static> EmailEditor<H> {
    /// Start a session on `template`. The host receives one change event for
    /// the initial document.
    pub fn new(template: Document, host: H, options: EditorOptions) -> Self {
        let host = Rc::new(RefCell::new(host));
        let mut store = EditorStore::new(template);

        let listener = Rc::clone(&host);
        let compile = options.compile.clone();
        let subscription = store.subscribe(move |event| {
            if event.change == StoreChange::Document {
                publish(&listener, event.document, &compile);
            }
        });

        publish(&host, store.document(), &options.compile);
        info!(blocks = store.document().len(), "editor session started");

        Self {
            store,
            host,
            ids: options.ids,
            content: ContentEditor::new(options.debounce),
            compile: options.compile,
            subscription,
        }
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EditorStore {
        &mut self.store
    }

    pub fn document(&self) -> &Document {
        self.store.document()
    }

    pub fn host(&self) -> Ref<'_, H> {
        self.host.borrow()
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    pub fn select(&mut self, block_id: Option<BlockId>) {
        self.store.set_selected_block_id(block_id);
    }

    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        Ok(mutation.apply(&mut self.store, &mut self.ids)?)
    }

    /// Inspector panel for the current selection
    pub fn panel(&self) -> Result<BlockPanel, EditorError> {
        BlockPanel::for_selection(&self.store)
    }

    /// Tree the editor canvas draws, starting at the root block
    pub fn render(&self) -> RenderNode {
        render(&self.store, ROOT_BLOCK_ID)
    }

    /// HTML for the current document, as exported or as previewed
    pub fn html(&self, mode: ReaderMode) -> Result<String, EditorError> {
        let ready = prepare_for_reader(self.store.document(), mode);
        Ok(compile_to_html(&ready, ROOT_BLOCK_ID, &self.compile)?)
    }

    pub fn edit_content(
        &mut self,
        block_id: &str,
        content: impl Into<String>,
        now: Instant,
    ) -> Result<(), EditorError> {
        self.content.edit(&self.store, block_id, content, now)
    }

    /// Commit inline edits whose quiet period has passed
    pub fn tick(&mut self, now: Instant) -> Vec<BlockId> {
        self.content.tick(&mut self.store, now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.content.next_deadline()
    }

    pub fn flush(&mut self) -> Vec<BlockId> {
        self.content.flush(&mut self.store)
    }

    /// Upload through the host and point the Image or Avatar at the result
    #[instrument(skip(self, file), fields(file = %file.file_name))]
    pub fn upload_image(&mut self, block_id: &str, file: &FileUpload) -> Result<String, EditorError> {
        let mut panel = BlockPanel::new(&self.store, block_id)?;
        let key = match panel.block_type() {
            BlockType::Image => "url",
            BlockType::Avatar => "imageUrl",
            other => {
                return Err(EditorError::Unsupported {
                    block_type: other,
                    what: "image uploads",
                })
            }
        };

        let url = self.host.borrow_mut().on_file_upload(file)?;
        debug!(%url, "upload stored");

        let mut patch = Map::new();
        patch.insert(key.to_string(), Value::String(url.clone()));
        panel.patch_props(&mut self.store, patch)?;
        Ok(url)
    }
}

impl<H: EditorHost + 'static> Drop for EmailEditor<H> {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

fn publish<H: EditorHost>(host: &Rc<RefCell<H>>, document: &Document, options: &CompileOptions) {
    let ready = prepare_for_reader(document, ReaderMode::Export);
    let mut host = host.borrow_mut();
    match compile_to_html(&ready, ROOT_BLOCK_ID, options) {
        Ok(html) => host.on_change(&ChangeEvent {
            html,
            design: document,
        }),
        Err(err) => error!(error = %err, "could not render change to html"),
    }
    host.on_snapshot(document);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        changes: Vec<String>,
        snapshots: usize,
    }

    impl EditorHost for Recorder {
        fn on_change(&mut self, event: &ChangeEvent<'_>) {
            self.changes.push(event.html.clone());
        }

        fn on_file_upload(&mut self, file: &FileUpload) -> Result<String, UploadError> {
            Ok(format!("https://cdn.test/{}", file.file_name))
        }

        fn on_snapshot(&mut self, _design: &Document) {
            self.snapshots += 1;
        }
    }

    #[test]
    fn test_initial_change_event() {
        let editor = EmailEditor::new(Document::default(), Recorder::default(), EditorOptions::default());
        assert_eq!(editor.host().changes.len(), 1);
        assert_eq!(editor.host().snapshots, 1);
    }

    #[test]
    fn test_selection_does_not_publish() {
        let mut editor =
            EmailEditor::new(Document::default(), Recorder::default(), EditorOptions::default());
        editor.select(Some(ROOT_BLOCK_ID.to_string()));
        editor.store_mut().toggle_inspector_drawer();
        assert_eq!(editor.host().changes.len(), 1);
    }

    #[test]
    fn test_missing_root_still_snapshots() {
        let editor = EmailEditor::new(Document::empty(), Recorder::default(), EditorOptions::default());
        assert!(editor.host().changes.is_empty());
        assert_eq!(editor.host().snapshots, 1);
    }
}
