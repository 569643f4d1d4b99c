//! Uniform access to the three child-list shapes.
//!
//! `EmailLayout` stores `childrenIds` at the top of its data, `Container`
//! under `props.childrenIds`, and `ColumnsContainer` once per cell under
//! `props.columns[i].childrenIds`. Each exposes its lists as numbered slots.
//!
//! An absent list and an empty list are the same slot. Writing a slot always
//! makes it present, so a list emptied by a delete is stored as `[]`.

use crate::block::{Block, BlockData, EmailLayoutData};
use crate::document::BlockId;
use crate::props::{Column, ColumnsContainerProps, ContainerProps, COLUMN_SLOTS};

pub trait HasChildren {
    /// Number of child lists this container owns
    fn slot_count(&self) -> usize;

    /// Ids in one slot. Unknown slots and absent lists read as empty.
    fn children(&self, slot: usize) -> &[BlockId];

    /// Replace the ids of one slot
    fn with_children(self, slot: usize, ids: Vec<BlockId>) -> Self;
}

impl HasChildren for EmailLayoutData {
    fn slot_count(&self) -> usize {
        1
    }

    fn children(&self, slot: usize) -> &[BlockId] {
        match slot {
            0 => self.children_ids.as_deref().unwrap_or(&[]),
            _ => &[],
        }
    }

    fn with_children(mut self, slot: usize, ids: Vec<BlockId>) -> Self {
        if slot == 0 {
            self.children_ids = Some(ids);
        }
        self
    }
}

impl HasChildren for BlockData<ContainerProps> {
    fn slot_count(&self) -> usize {
        1
    }

    fn children(&self, slot: usize) -> &[BlockId] {
        match (slot, &self.props) {
            (0, Some(props)) => props.children_ids.as_deref().unwrap_or(&[]),
            _ => &[],
        }
    }

    fn with_children(mut self, slot: usize, ids: Vec<BlockId>) -> Self {
        if slot == 0 {
            self.props.get_or_insert_with(ContainerProps::default).children_ids = Some(ids);
        }
        self
    }
}

impl HasChildren for BlockData<ColumnsContainerProps> {
    fn slot_count(&self) -> usize {
        COLUMN_SLOTS
    }

    fn children(&self, slot: usize) -> &[BlockId] {
        self.props
            .as_ref()
            .and_then(|props| props.columns.get(slot))
            .map(|column| column.children_ids.as_slice())
            .unwrap_or(&[])
    }

    fn with_children(mut self, slot: usize, ids: Vec<BlockId>) -> Self {
        if slot >= COLUMN_SLOTS {
            return self;
        }
        let props = self.props.get_or_insert_with(ColumnsContainerProps::default);
        if props.columns.len() < COLUMN_SLOTS {
            props.columns.resize(COLUMN_SLOTS, Column::default());
        }
        props.columns[slot].children_ids = ids;
        self
    }
}

impl Block {
    /// Number of child lists; zero for leaf blocks
    pub fn child_slot_count(&self) -> usize {
        match self {
            Block::EmailLayout(d) => d.slot_count(),
            Block::Container(d) => d.slot_count(),
            Block::ColumnsContainer(d) => d.slot_count(),
            _ => 0,
        }
    }

    pub fn children(&self, slot: usize) -> &[BlockId] {
        match self {
            Block::EmailLayout(d) => d.children(slot),
            Block::Container(d) => d.children(slot),
            Block::ColumnsContainer(d) => d.children(slot),
            _ => &[],
        }
    }

    /// Every child id across all slots, in slot order
    pub fn all_children(&self) -> impl Iterator<Item = &BlockId> {
        (0..self.child_slot_count()).flat_map(move |slot| self.children(slot).iter())
    }

    /// Replace one slot. Leaf blocks are returned unchanged.
    pub fn with_children(self, slot: usize, ids: Vec<BlockId>) -> Block {
        match self {
            Block::EmailLayout(d) => Block::EmailLayout(d.with_children(slot, ids)),
            Block::Container(d) => Block::Container(d.with_children(slot, ids)),
            Block::ColumnsContainer(d) => Block::ColumnsContainer(d.with_children(slot, ids)),
            other => other,
        }
    }

    /// Rewrite each slot through `f`. Slots whose ids come back unchanged
    /// are left untouched, so absent lists stay absent.
    pub fn map_children<F>(self, mut f: F) -> Block
    where
        F: FnMut(usize, Vec<BlockId>) -> Vec<BlockId>,
    {
        let mut block = self;
        for slot in 0..block.child_slot_count() {
            let current = block.children(slot).to_vec();
            let next = f(slot, current.clone());
            if next != current {
                block = block.with_children(slot, next);
            }
        }
        block
    }
}
