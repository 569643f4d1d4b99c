//! # Block Tree Renderer
//!
//! Resolves a block id into a [`RenderNode`] tree the UI layer draws.
//!
//! Missing ids and ids already on the current path render as placeholders
//! instead of failing. Child lists are interleaved with insert points so the
//! add-block affordance knows exactly which slot and index it targets.

use crate::errors::EditorError;
use crate::mutations::{InsertPosition, InsertTarget};
use crate::store::EditorStore;
use mailframe_schema::{validate, Block, BlockId, BlockType, Document};
use serde_json::Value;
use std::fmt::{self, Write};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderReason {
    /// No entry exists for the id
    Missing,
    /// The id is one of its own ancestors
    Cycle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Block(BlockView),
    Placeholder {
        block_id: BlockId,
        reason: PlaceholderReason,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockView {
    pub id: BlockId,
    pub block: Block,
    pub selected: bool,
    /// One entry per child slot, empty for leaf blocks
    pub slots: Vec<Vec<RenderItem>>,
    pub updater: BlockUpdater,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem {
    InsertPoint(InsertPoint),
    Node(RenderNode),
}

/// "Add block here" affordance between children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPoint {
    pub target: InsertTarget,
    /// Shown as the only content of an empty list
    pub placeholder: bool,
    /// Directly follows the selected block
    pub after_selected: bool,
    /// Directly precedes the selected block
    pub before_selected: bool,
}

/// Bound setter for one document entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockUpdater {
    id: BlockId,
    block_type: BlockType,
}

impl BlockUpdater {
    pub fn new(id: impl Into<BlockId>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// Replace the bound entry. A block of another type is rejected.
    pub fn set(&self, store: &mut EditorStore, block: Block) -> Result<(), EditorError> {
        if block.block_type() != self.block_type {
            return Err(EditorError::TypeMismatch {
                id: self.id.clone(),
                expected: self.block_type,
                found: block.block_type(),
            });
        }
        store.set_document([(self.id.clone(), block)]);
        Ok(())
    }

    /// Validate raw `data` with the bound type's schema, then replace
    pub fn set_data(&self, store: &mut EditorStore, data: &Value) -> Result<(), EditorError> {
        let block = validate(self.block_type, data)?;
        self.set(store, block)
    }
}

/// Render the subtree rooted at `block_id`
pub fn render(store: &EditorStore, block_id: &str) -> RenderNode {
    let mut path = Vec::new();
    render_node(store.document(), store.selected_block_id(), block_id, &mut path)
}

fn render_node<'a>(
    doc: &'a Document,
    selected: Option<&str>,
    block_id: &'a str,
    path: &mut Vec<&'a str>,
) -> RenderNode {
    if path.contains(&block_id) {
        warn!(%block_id, "cycle in block tree");
        return RenderNode::Placeholder {
            block_id: block_id.to_string(),
            reason: PlaceholderReason::Cycle,
        };
    }
    let Some(block) = doc.get(block_id) else {
        warn!(%block_id, "dangling block reference");
        return RenderNode::Placeholder {
            block_id: block_id.to_string(),
            reason: PlaceholderReason::Missing,
        };
    };

    path.push(block_id);
    let slots = (0..block.child_slot_count())
        .map(|slot| render_slot(doc, selected, block_id, slot, block.children(slot), path))
        .collect();
    path.pop();

    RenderNode::Block(BlockView {
        id: block_id.to_string(),
        block: block.clone(),
        selected: selected == Some(block_id),
        slots,
        updater: BlockUpdater::new(block_id, block.block_type()),
    })
}

fn render_slot<'a>(
    doc: &'a Document,
    selected: Option<&str>,
    parent_id: &str,
    slot: usize,
    children: &'a [BlockId],
    path: &mut Vec<&'a str>,
) -> Vec<RenderItem> {
    let target = |position| InsertTarget {
        parent_id: parent_id.to_string(),
        column: slot,
        position,
    };

    if children.is_empty() {
        return vec![RenderItem::InsertPoint(InsertPoint {
            target: target(InsertPosition::Append),
            placeholder: true,
            after_selected: false,
            before_selected: false,
        })];
    }

    let mut items = Vec::with_capacity(children.len() * 2 + 1);
    for (index, child) in children.iter().enumerate() {
        items.push(RenderItem::InsertPoint(InsertPoint {
            target: target(InsertPosition::Before { index }),
            placeholder: false,
            after_selected: index > 0 && selected == Some(children[index - 1].as_str()),
            before_selected: selected == Some(child.as_str()),
        }));
        items.push(RenderItem::Node(render_node(doc, selected, child, path)));
    }
    items.push(RenderItem::InsertPoint(InsertPoint {
        target: target(InsertPosition::Append),
        placeholder: false,
        after_selected: selected == children.last().map(String::as_str),
        before_selected: false,
    }));
    items
}

impl RenderNode {
    pub fn block_id(&self) -> &str {
        match self {
            RenderNode::Block(view) => &view.id,
            RenderNode::Placeholder { block_id, .. } => block_id,
        }
    }

    /// Rendered nodes below this one in order, insert points skipped
    pub fn children(&self) -> Vec<&RenderNode> {
        match self {
            RenderNode::Block(view) => view
                .slots
                .iter()
                .flatten()
                .filter_map(|item| match item {
                    RenderItem::Node(node) => Some(node),
                    RenderItem::InsertPoint(_) => None,
                })
                .collect(),
            RenderNode::Placeholder { .. } => Vec::new(),
        }
    }

    pub fn placeholder_count(&self) -> usize {
        match self {
            RenderNode::Placeholder { .. } => 1,
            RenderNode::Block(_) => self.children().iter().map(|c| c.placeholder_count()).sum(),
        }
    }

    /// Indented text outline, one node per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        // Writing into a String cannot fail.
        let _ = match self {
            RenderNode::Block(view) => {
                let marker = if view.selected { " *" } else { "" };
                writeln!(out, "{}{} [{}]{}", indent, view.block.block_type(), view.id, marker)
            }
            RenderNode::Placeholder { block_id, reason } => {
                writeln!(out, "{}<{}> [{}]", indent, reason, block_id)
            }
        };

        if let RenderNode::Block(view) = self {
            let columns = view.slots.len() > 1;
            for (slot, items) in view.slots.iter().enumerate() {
                let child_depth = if columns {
                    let _ = writeln!(out, "{}  column {}", indent, slot);
                    depth + 2
                } else {
                    depth + 1
                };
                for item in items {
                    if let RenderItem::Node(node) = item {
                        node.write_outline(out, child_depth);
                    }
                }
            }
        }
    }
}

impl fmt::Display for PlaceholderReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderReason::Missing => f.write_str("missing"),
            PlaceholderReason::Cycle => f.write_str("cycle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailframe_schema::{BlockData, ContainerProps, ROOT_BLOCK_ID};

    fn store_with(children: &[&str]) -> EditorStore {
        let mut doc = Document::empty();
        doc.insert(
            ROOT_BLOCK_ID,
            Block::starter(BlockType::EmailLayout)
                .with_children(0, children.iter().map(|c| c.to_string()).collect()),
        );
        EditorStore::new(doc)
    }

    #[test]
    fn test_empty_root_has_placeholder_insert_point() {
        let store = store_with(&[]);
        let RenderNode::Block(view) = render(&store, ROOT_BLOCK_ID) else {
            panic!("root should render");
        };
        assert_eq!(view.slots.len(), 1);
        match &view.slots[0][..] {
            [RenderItem::InsertPoint(point)] => {
                assert!(point.placeholder);
                assert_eq!(point.target, InsertTarget::append(ROOT_BLOCK_ID));
            }
            other => panic!("unexpected items {other:?}"),
        }
    }

    #[test]
    fn test_missing_child_renders_placeholder() {
        let mut store = store_with(&["ghost", "t"]);
        store.set_document([("t".to_string(), Block::starter(BlockType::Text))]);

        let node = render(&store, ROOT_BLOCK_ID);
        let children = node.children();
        assert_eq!(children.len(), 2);
        assert_eq!(
            *children[0],
            RenderNode::Placeholder {
                block_id: "ghost".into(),
                reason: PlaceholderReason::Missing
            }
        );
        assert_eq!(node.placeholder_count(), 1);
    }

    #[test]
    fn test_cycle_renders_placeholder() {
        let mut store = store_with(&["box"]);
        store.set_document([(
            "box".to_string(),
            Block::Container(BlockData::new(
                None,
                Some(ContainerProps {
                    children_ids: Some(vec!["box".into()]),
                }),
            )),
        )]);

        let node = render(&store, ROOT_BLOCK_ID);
        let inner = node.children()[0].children();
        assert_eq!(
            *inner[0],
            RenderNode::Placeholder {
                block_id: "box".into(),
                reason: PlaceholderReason::Cycle
            }
        );
    }

    #[test]
    fn test_insert_points_track_selection() {
        let mut store = store_with(&["a", "b"]);
        store.set_document([
            ("a".to_string(), Block::starter(BlockType::Text)),
            ("b".to_string(), Block::starter(BlockType::Text)),
        ]);
        store.set_selected_block_id(Some("a".into()));

        let RenderNode::Block(view) = render(&store, ROOT_BLOCK_ID) else {
            panic!("root should render");
        };
        let points: Vec<_> = view.slots[0]
            .iter()
            .filter_map(|item| match item {
                RenderItem::InsertPoint(p) => Some((p.before_selected, p.after_selected)),
                _ => None,
            })
            .collect();
        assert_eq!(points, vec![(true, false), (false, true), (false, false)]);
    }

    #[test]
    fn test_updater_rejects_other_type() {
        let mut store = store_with(&["a"]);
        store.set_document([("a".to_string(), Block::starter(BlockType::Text))]);

        let updater = BlockUpdater::new("a", BlockType::Text);
        let err = updater
            .set(&mut store, Block::starter(BlockType::Heading))
            .unwrap_err();
        assert!(matches!(err, EditorError::TypeMismatch { .. }));

        updater
            .set_data(&mut store, &serde_json::json!({"props": {"richText": "<p>hi</p>"}}))
            .unwrap();
        let json = store.document().get("a").unwrap().data_value();
        assert_eq!(json["props"]["richText"], "<p>hi</p>");
    }

    #[test]
    fn test_outline() {
        let mut store = store_with(&["a"]);
        store.set_document([("a".to_string(), Block::starter(BlockType::Text))]);
        assert_eq!(
            render(&store, ROOT_BLOCK_ID).outline(),
            "EmailLayout [root]\n  Text [a]\n"
        );
    }
}
