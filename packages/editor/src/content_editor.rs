//! Debounced inline content editing.
//!
//! Keystrokes in an inline editor schedule a commit; a later keystroke in
//! the same block cancels the earlier one, so only the latest content
//! within the quiet period reaches the store.

use crate::debounce::FieldDebouncer;
use crate::errors::EditorError;
use crate::store::EditorStore;
use mailframe_schema::{Block, BlockId, BlockType};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct ContentEditor {
    pending: FieldDebouncer<BlockId, String>,
}

impl Default for ContentEditor {
    fn default() -> Self {
        Self {
            pending: FieldDebouncer::default(),
        }
    }
}

impl ContentEditor {
    pub fn new(delay: Duration) -> Self {
        Self {
            pending: FieldDebouncer::new(delay),
        }
    }

    /// Whether a block type has inline editable content
    pub fn edits(block_type: BlockType) -> bool {
        matches!(
            block_type,
            BlockType::Text | BlockType::Heading | BlockType::Button
        )
    }

    /// Record new content for a block and restart its timer
    pub fn edit(
        &mut self,
        store: &EditorStore,
        block_id: &str,
        content: impl Into<String>,
        now: Instant,
    ) -> Result<(), EditorError> {
        let block = store
            .document()
            .get(block_id)
            .ok_or_else(|| EditorError::BlockNotFound(block_id.to_string()))?;
        if !Self::edits(block.block_type()) {
            return Err(EditorError::Unsupported {
                block_type: block.block_type(),
                what: "inline content",
            });
        }
        self.pending.push(block_id.to_string(), content.into(), now);
        Ok(())
    }

    pub fn is_pending(&self, block_id: &str) -> bool {
        self.pending.is_pending(&block_id.to_string())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.next_deadline()
    }

    /// Commit every edit whose quiet period has passed. Returns the ids
    /// whose stored content actually changed.
    pub fn tick(&mut self, store: &mut EditorStore, now: Instant) -> Vec<BlockId> {
        let due = self.pending.take_due(now);
        commit_all(store, due)
    }

    /// Commit everything pending, e.g. when the editor loses focus
    pub fn flush(&mut self, store: &mut EditorStore) -> Vec<BlockId> {
        let all = self.pending.flush();
        commit_all(store, all)
    }
}

fn commit_all(store: &mut EditorStore, edits: Vec<(BlockId, String)>) -> Vec<BlockId> {
    let mut committed = Vec::new();
    for (block_id, content) in edits {
        match commit_content(store, &block_id, content) {
            Ok(true) => committed.push(block_id),
            Ok(false) => debug!(%block_id, "content unchanged"),
            Err(err) => warn!(%block_id, error = %err, "dropping content edit"),
        }
    }
    committed
}

/// Write content into the field the block's inline editor owns. Returns
/// false when the stored value already matches.
fn commit_content(store: &mut EditorStore, block_id: &str, content: String) -> Result<bool, EditorError> {
    let block = store
        .document()
        .get(block_id)
        .cloned()
        .ok_or_else(|| EditorError::BlockNotFound(block_id.to_string()))?;

    let updated = match block {
        Block::Text(mut data) => {
            let props = data.props.get_or_insert_with(Default::default);
            if props.rich_text.as_deref() == Some(content.as_str()) {
                return Ok(false);
            }
            props.rich_text = Some(content);
            Block::Text(data)
        }
        Block::Heading(mut data) => {
            let props = data.props.get_or_insert_with(Default::default);
            if props.text.as_deref() == Some(content.as_str()) {
                return Ok(false);
            }
            props.text = Some(content);
            Block::Heading(data)
        }
        Block::Button(mut data) => {
            let props = data.props.get_or_insert_with(Default::default);
            if props.text.as_deref() == Some(content.as_str()) {
                return Ok(false);
            }
            props.text = Some(content);
            Block::Button(data)
        }
        other => {
            return Err(EditorError::Unsupported {
                block_type: other.block_type(),
                what: "inline content",
            })
        }
    };

    store.set_document([(block_id.to_string(), updated)]);
    Ok(true)
}
