//! # Block Mutations
//!
//! Structural operations on the block tree: insert, move and delete.
//!
//! ## Design Principles
//!
//! 1. **Atomic**: each operation computes a complete next document and
//!    commits it with a single `reset_document`
//! 2. **Shape-agnostic**: child lists are reached through slots, never by
//!    matching on the container type
//! 3. **Order-preserving**: child lists keep exactly the order produced
//!
//! ## Mutation Semantics
//!
//! ### Insert
//! - Splices a fresh id into one slot of one parent
//! - An index past the end appends
//! - The payload must be a leaf or an empty container; a layout or a
//!   container that already lists children is rejected
//! - The new block becomes the selection
//!
//! ### Move
//! - Swaps the block with its neighbour in every list that holds it
//! - No-op at either end of the list; the block is selected either way
//!
//! ### Delete
//! - Removes the entry and purges its id from every child list
//! - Descendants are NOT removed; they stay in the document as orphans
//! - A list the delete empties is kept as `[]`, which reads the same as an
//!   absent list
//! - The root cannot be deleted

use crate::ids::BlockIdGenerator;
use crate::store::EditorStore;
use mailframe_schema::{Block, BlockId, BlockType, Document, ROOT_BLOCK_ID};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Where in a child list a new block lands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InsertPosition {
    Append,
    Before { index: usize },
}

/// A child-list slot: the parent plus, for columns, the cell number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertTarget {
    pub parent_id: BlockId,
    #[serde(default)]
    pub column: usize,
    pub position: InsertPosition,
}

impl InsertTarget {
    pub fn append(parent_id: impl Into<BlockId>) -> Self {
        Self {
            parent_id: parent_id.into(),
            column: 0,
            position: InsertPosition::Append,
        }
    }

    pub fn before(parent_id: impl Into<BlockId>, index: usize) -> Self {
        Self {
            parent_id: parent_id.into(),
            column: 0,
            position: InsertPosition::Before { index },
        }
    }

    pub fn in_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }
}

/// Structural mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Add a new block under a parent
    #[serde(rename_all = "camelCase")]
    InsertBlock { target: InsertTarget, block: Block },

    /// Swap a block with its neighbour
    #[serde(rename_all = "camelCase")]
    MoveBlock { block_id: BlockId, direction: Direction },

    /// Remove a block and every reference to it
    #[serde(rename_all = "camelCase")]
    DeleteBlock { block_id: BlockId },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Parent not found: {0}")]
    ParentNotFound(BlockId),

    #[error("Block '{0}' cannot have children")]
    NotAContainer(BlockId),

    #[error("Block '{parent_id}' has {slots} child list(s), no column {column}")]
    ColumnOutOfRange {
        parent_id: BlockId,
        column: usize,
        slots: usize,
    },

    #[error("The root block cannot be deleted")]
    CannotDeleteRoot,

    #[error("An {0} block cannot be inserted")]
    LayoutPayload(BlockType),

    #[error("Inserted {block_type} block already lists children: {children:?}")]
    PayloadHasChildren {
        block_type: BlockType,
        children: Vec<BlockId>,
    },
}

/// Outcome of a committed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationResult {
    /// Store version after the mutation
    pub version: u64,
    /// Block the mutation was about (the new id for inserts)
    pub block_id: BlockId,
    /// False when the document was left as it was
    pub changed: bool,
}

impl Mutation {
    /// Check the mutation can be applied to `doc`
    pub fn validate(&self, doc: &Document) -> Result<(), MutationError> {
        match self {
            Mutation::InsertBlock { target, block } => {
                check_target(doc, target)?;
                check_payload(block)
            }
            Mutation::MoveBlock { block_id, .. } => {
                if doc.contains(block_id) {
                    Ok(())
                } else {
                    Err(MutationError::BlockNotFound(block_id.clone()))
                }
            }
            Mutation::DeleteBlock { block_id } => {
                if block_id == ROOT_BLOCK_ID {
                    Err(MutationError::CannotDeleteRoot)
                } else if doc.contains(block_id) {
                    Ok(())
                } else {
                    Err(MutationError::BlockNotFound(block_id.clone()))
                }
            }
        }
    }

    /// Apply against the store, committing once and updating the selection
    #[instrument(skip(self, store, ids), fields(mutation = self.name()))]
    pub fn apply(
        &self,
        store: &mut EditorStore,
        ids: &mut BlockIdGenerator,
    ) -> Result<MutationResult, MutationError> {
        self.validate(store.document())?;

        match self {
            Mutation::InsertBlock { target, block } => {
                let (next, new_id) = insert_block(store.document(), target, block.clone(), ids)?;
                info!(block_id = %new_id, parent_id = %target.parent_id, "block inserted");
                store.reset_document(next);
                store.set_selected_block_id(Some(new_id.clone()));
                Ok(MutationResult {
                    version: store.version(),
                    block_id: new_id,
                    changed: true,
                })
            }

            Mutation::MoveBlock {
                block_id,
                direction,
            } => {
                let next = move_block(store.document(), block_id, *direction)?;
                let changed = next != *store.document();
                if changed {
                    info!(%block_id, ?direction, "block moved");
                    store.reset_document(next);
                }
                store.set_selected_block_id(Some(block_id.clone()));
                Ok(MutationResult {
                    version: store.version(),
                    block_id: block_id.clone(),
                    changed,
                })
            }

            Mutation::DeleteBlock { block_id } => {
                let next = delete_block(store.document(), block_id)?;
                info!(%block_id, "block deleted");
                store.reset_document(next);
                if store.selected_block_id() == Some(block_id.as_str()) {
                    store.set_selected_block_id(None);
                }
                Ok(MutationResult {
                    version: store.version(),
                    block_id: block_id.clone(),
                    changed: true,
                })
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertBlock { .. } => "InsertBlock",
            Mutation::MoveBlock { .. } => "MoveBlock",
            Mutation::DeleteBlock { .. } => "DeleteBlock",
        }
    }
}

fn check_target(doc: &Document, target: &InsertTarget) -> Result<(), MutationError> {
    let parent = doc
        .get(&target.parent_id)
        .ok_or_else(|| MutationError::ParentNotFound(target.parent_id.clone()))?;

    let slots = parent.child_slot_count();
    if slots == 0 {
        return Err(MutationError::NotAContainer(target.parent_id.clone()));
    }
    if target.column >= slots {
        return Err(MutationError::ColumnOutOfRange {
            parent_id: target.parent_id.clone(),
            column: target.column,
            slots,
        });
    }
    Ok(())
}

fn check_payload(block: &Block) -> Result<(), MutationError> {
    let block_type = block.block_type();
    if block_type == BlockType::EmailLayout {
        return Err(MutationError::LayoutPayload(block_type));
    }
    let children: Vec<BlockId> = block.all_children().cloned().collect();
    if !children.is_empty() {
        return Err(MutationError::PayloadHasChildren {
            block_type,
            children,
        });
    }
    Ok(())
}

/// Next document with `block` stored under a fresh id and spliced into the
/// target slot. Returns the new id.
pub fn insert_block(
    doc: &Document,
    target: &InsertTarget,
    block: Block,
    ids: &mut BlockIdGenerator,
) -> Result<(Document, BlockId), MutationError> {
    check_target(doc, target)?;
    check_payload(&block)?;

    let new_id = ids.unused_id(|candidate| doc.contains(candidate));
    let mut next = doc.clone();

    if let Some(parent) = next.get(&target.parent_id).cloned() {
        let mut children = parent.children(target.column).to_vec();
        let index = match target.position {
            InsertPosition::Append => children.len(),
            InsertPosition::Before { index } => index.min(children.len()),
        };
        children.insert(index, new_id.clone());
        next.insert(
            target.parent_id.clone(),
            parent.with_children(target.column, children),
        );
    }
    next.insert(new_id.clone(), block);

    Ok((next, new_id))
}

/// Next document with `block_id` swapped towards `direction` in every list
/// holding it
pub fn move_block(
    doc: &Document,
    block_id: &str,
    direction: Direction,
) -> Result<Document, MutationError> {
    if !doc.contains(block_id) {
        return Err(MutationError::BlockNotFound(block_id.to_string()));
    }

    Ok(rewrite_child_lists(doc, block_id, |mut ids| {
        if let Some(index) = ids.iter().position(|id| id == block_id) {
            match direction {
                Direction::Up if index > 0 => ids.swap(index, index - 1),
                Direction::Down if index + 1 < ids.len() => ids.swap(index, index + 1),
                _ => {}
            }
        }
        ids
    }))
}

/// Next document without `block_id` and without any reference to it
pub fn delete_block(doc: &Document, block_id: &str) -> Result<Document, MutationError> {
    if block_id == ROOT_BLOCK_ID {
        return Err(MutationError::CannotDeleteRoot);
    }
    if !doc.contains(block_id) {
        return Err(MutationError::BlockNotFound(block_id.to_string()));
    }

    let mut next = rewrite_child_lists(doc, block_id, |ids| {
        ids.into_iter().filter(|id| id != block_id).collect()
    });
    next.remove(block_id);
    Ok(next)
}

/// Run every child list of every block except `skip` through `f`
fn rewrite_child_lists<F>(doc: &Document, skip: &str, f: F) -> Document
where
    F: Fn(Vec<BlockId>) -> Vec<BlockId>,
{
    doc.iter()
        .map(|(id, block)| {
            let block = if id == skip {
                block.clone()
            } else {
                block.clone().map_children(|_, ids| f(ids))
            };
            (id.clone(), block)
        })
        .collect()
}
