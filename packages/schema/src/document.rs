//! # Document
//!
//! Ordered mapping from block id to [`Block`], rooted at [`ROOT_BLOCK_ID`].
//!
//! Insertion order is kept: replacing an existing key keeps its position and
//! new keys are appended. The JSON form is a plain object in that order.
//!
//! Referential integrity is NOT enforced here. [`Document::check_integrity`]
//! and [`Document::orphans`] report problems for tooling.

use crate::block::{Block, BlockType};
use crate::error::{BlockError, DocumentError};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Opaque block identifier
pub type BlockId = String;

/// Reserved id of the `EmailLayout` root
pub const ROOT_BLOCK_ID: &str = "root";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    order: Vec<BlockId>,
    blocks: HashMap<BlockId, Block>,
}

/// Where a block sits inside its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildLocation {
    pub parent_id: BlockId,
    pub slot: usize,
    pub index: usize,
}

/// Structural problem found by [`Document::check_integrity`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    #[error("document has no '{}' block", ROOT_BLOCK_ID)]
    MissingRoot,

    #[error("root block is {0}, expected EmailLayout")]
    RootNotEmailLayout(BlockType),

    #[error("block '{parent}' references missing child '{child}'")]
    DanglingChild { parent: BlockId, child: BlockId },

    #[error("block '{child}' has several parents: {}", join_ids(.parents))]
    MultipleParents { child: BlockId, parents: Vec<BlockId> },

    #[error("block '{0}' is its own ancestor")]
    Cycle(BlockId),
}

fn join_ids(ids: &[BlockId]) -> String {
    ids.join(", ")
}

impl Default for Document {
    /// A document holding only an empty root layout
    fn default() -> Self {
        let mut document = Document::empty();
        document.insert(ROOT_BLOCK_ID, Block::starter(BlockType::EmailLayout));
        document
    }
}

impl Document {
    /// A document with no entries at all, not even a root
    pub fn empty() -> Self {
        Self {
            order: Vec::new(),
            blocks: HashMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn root(&self) -> Option<&Block> {
        self.get(ROOT_BLOCK_ID)
    }

    /// Insert or replace one entry, returning the previous block
    pub fn insert(&mut self, id: impl Into<BlockId>, block: Block) -> Option<Block> {
        let id = id.into();
        let previous = self.blocks.insert(id.clone(), block);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    pub fn remove(&mut self, id: &str) -> Option<Block> {
        let removed = self.blocks.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Full replacement per key, in the order given
    pub fn merge(&mut self, partial: impl IntoIterator<Item = (BlockId, Block)>) {
        for (id, block) in partial {
            self.insert(id, block);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BlockId> {
        self.order.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockId, &Block)> {
        self.order
            .iter()
            .filter_map(move |id| self.blocks.get(id).map(|block| (id, block)))
    }

    /// First container slot listing `id`, scanning blocks in document order
    pub fn find_parent(&self, id: &str) -> Option<ChildLocation> {
        self.iter().find_map(|(parent_id, block)| {
            (0..block.child_slot_count()).find_map(|slot| {
                block
                    .children(slot)
                    .iter()
                    .position(|child| child == id)
                    .map(|index| ChildLocation {
                        parent_id: parent_id.clone(),
                        slot,
                        index,
                    })
            })
        })
    }

    /// Build a document from raw `(id, {type, data})` entries, validating
    /// each one. Every failing id is reported, not only the first.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (BlockId, Value)>,
    ) -> Result<Self, DocumentError> {
        let mut document = Document::empty();
        let mut failures: Vec<(BlockId, BlockError)> = Vec::new();

        for (id, raw) in entries {
            match Block::try_from(raw) {
                Ok(block) => {
                    document.insert(id, block);
                }
                Err(err) => failures.push((id, err)),
            }
        }

        if failures.is_empty() {
            Ok(document)
        } else {
            Err(DocumentError::InvalidBlocks(failures))
        }
    }

    /// Parse a template from JSON text, keeping the key order of the source
    pub fn from_json_str(text: &str) -> Result<Self, DocumentError> {
        let raw: RawEntries = serde_json::from_str(text)?;
        Self::from_entries(raw.0)
    }

    /// Parse a template from an already-decoded JSON value, keeping the
    /// value's insertion order
    pub fn from_json_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(map) => Self::from_entries(map),
            _ => Err(DocumentError::NotAnObject),
        }
    }

    pub fn to_json_value(&self) -> Value {
        // Blocks are plain data and always serialize.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Ids not reachable from the root
    pub fn orphans(&self) -> Vec<BlockId> {
        let reachable = self.reachable_from_root();
        self.order
            .iter()
            .filter(|id| !reachable.contains(id.as_str()))
            .cloned()
            .collect()
    }

    fn reachable_from_root(&self) -> HashSet<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = Vec::new();
        if self.contains(ROOT_BLOCK_ID) {
            stack.push(ROOT_BLOCK_ID);
        }
        while let Some(id) = stack.pop() {
            let Some((key, block)) = self.blocks.get_key_value(id) else {
                continue;
            };
            if !seen.insert(key.as_str()) {
                continue;
            }
            stack.extend(block.all_children().map(|child| child.as_str()));
        }
        seen
    }

    /// Check the forest invariant: root present and an `EmailLayout`, every
    /// child id resolves, no id has two parents, and no cycles.
    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        match self.root() {
            None => issues.push(IntegrityIssue::MissingRoot),
            Some(block) if block.block_type() != BlockType::EmailLayout => {
                issues.push(IntegrityIssue::RootNotEmailLayout(block.block_type()))
            }
            Some(_) => {}
        }

        let mut parents: HashMap<&str, Vec<BlockId>> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for (parent, block) in self.iter() {
            for child in block.all_children() {
                if !self.contains(child) {
                    issues.push(IntegrityIssue::DanglingChild {
                        parent: parent.clone(),
                        child: child.clone(),
                    });
                    continue;
                }
                let entry = parents.entry(child.as_str()).or_default();
                if entry.is_empty() {
                    first_seen.push(child.as_str());
                }
                entry.push(parent.clone());
            }
        }
        for child in first_seen {
            if let Some(listed) = parents.get(child).filter(|p| p.len() > 1) {
                issues.push(IntegrityIssue::MultipleParents {
                    child: child.to_string(),
                    parents: listed.clone(),
                });
            }
        }

        issues.extend(self.find_cycles().into_iter().map(IntegrityIssue::Cycle));
        issues
    }

    /// Blocks closing a cycle, found by depth-first search over child edges
    fn find_cycles(&self) -> Vec<BlockId> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Active,
            Done,
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut cycles: Vec<BlockId> = Vec::new();

        for start in &self.order {
            if marks.contains_key(start.as_str()) {
                continue;
            }
            // (id, next child position)
            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            marks.insert(start.as_str(), Mark::Active);

            while let Some((id, cursor)) = stack.pop() {
                let children: Vec<&str> = self
                    .blocks
                    .get(id)
                    .map(|block| block.all_children().map(String::as_str).collect())
                    .unwrap_or_default();

                match children.get(cursor).copied() {
                    None => {
                        marks.insert(id, Mark::Done);
                    }
                    Some(child) => {
                        stack.push((id, cursor + 1));
                        if !self.contains(child) {
                            continue;
                        }
                        match marks.get(child) {
                            Some(Mark::Active) => {
                                if !cycles.iter().any(|c| c == child) {
                                    cycles.push(child.to_string());
                                }
                            }
                            Some(Mark::Done) => {}
                            None => {
                                marks.insert(child, Mark::Active);
                                stack.push((child, 0));
                            }
                        }
                    }
                }
            }
        }

        cycles
    }
}

impl FromIterator<(BlockId, Block)> for Document {
    fn from_iter<T: IntoIterator<Item = (BlockId, Block)>>(iter: T) -> Self {
        let mut document = Document::empty();
        document.merge(iter);
        document
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (id, block) in self.iter() {
            map.serialize_entry(id, block)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEntries::deserialize(deserializer)?;
        Document::from_entries(raw.0).map_err(serde::de::Error::custom)
    }
}

/// Object entries in source order, before validation
struct RawEntries(Vec<(BlockId, Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping block ids to blocks")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawEntries, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, value)) = access.next_entry::<BlockId, Value>()? {
                    entries.push((id, value));
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockData;
    use crate::props::ContainerProps;

    fn layout_with(children: &[&str]) -> Block {
        Block::starter(BlockType::EmailLayout)
            .with_children(0, children.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_default_has_empty_root() {
        let doc = Document::default();
        assert_eq!(doc.len(), 1);
        let root = doc.root().unwrap();
        assert_eq!(root.block_type(), BlockType::EmailLayout);
        assert!(root.children(0).is_empty());
        assert!(doc.check_integrity().is_empty());
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut doc = Document::default();
        doc.insert("a", Block::starter(BlockType::Text));
        doc.insert("b", Block::starter(BlockType::Spacer));
        doc.insert("a", Block::starter(BlockType::Divider));

        let ids: Vec<_> = doc.ids().map(String::as_str).collect();
        assert_eq!(ids, vec!["root", "a", "b"]);
        assert_eq!(doc.get("a").unwrap().block_type(), BlockType::Divider);
    }

    #[test]
    fn test_json_keeps_source_order() {
        let text = r#"{
            "zeta": {"type": "Spacer", "data": {}},
            "root": {"type": "EmailLayout", "data": {"childrenIds": ["zeta", "alpha"]}},
            "alpha": {"type": "Text", "data": {"props": {"richText": "hi"}}}
        }"#;
        let doc = Document::from_json_str(text).unwrap();
        let ids: Vec<_> = doc.ids().map(String::as_str).collect();
        assert_eq!(ids, vec!["zeta", "root", "alpha"]);

        let out = serde_json::to_string(&doc).unwrap();
        assert!(out.find("zeta").unwrap() < out.find("alpha").unwrap());
    }

    #[test]
    fn test_json_value_keeps_insertion_order() {
        let value = serde_json::json!({
            "zeta": {"type": "Spacer", "data": {}},
            "root": {"type": "EmailLayout", "data": {"childrenIds": ["zeta", "alpha"]}},
            "alpha": {"type": "Text", "data": {"props": {"richText": "hi"}}}
        });
        let doc = Document::from_json_value(value).unwrap();
        let ids: Vec<_> = doc.ids().map(String::as_str).collect();
        assert_eq!(ids, vec!["zeta", "root", "alpha"]);
    }

    #[test]
    fn test_from_json_reports_every_bad_block() {
        let text = r#"{
            "root": {"type": "EmailLayout", "data": {}},
            "b1": {"type": "Button", "data": {"props": {"variant": "ghost"}}},
            "b2": {"type": "Banner", "data": {}},
            "ok": {"type": "Text", "data": {}}
        }"#;
        match Document::from_json_str(text) {
            Err(DocumentError::InvalidBlocks(failures)) => {
                let ids: Vec<_> = failures.iter().map(|(id, _)| id.as_str()).collect();
                assert_eq!(ids, vec!["b1", "b2"]);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_find_parent_in_columns() {
        let mut doc = Document::empty();
        doc.insert("root", layout_with(&["cols"]));
        doc.insert(
            "cols",
            Block::starter(BlockType::ColumnsContainer).with_children(1, vec!["x".into(), "y".into()]),
        );
        doc.insert("x", Block::starter(BlockType::Text));
        doc.insert("y", Block::starter(BlockType::Text));

        let location = doc.find_parent("y").unwrap();
        assert_eq!(
            location,
            ChildLocation {
                parent_id: "cols".into(),
                slot: 1,
                index: 1
            }
        );
        assert!(doc.find_parent("root").is_none());
    }

    #[test]
    fn test_integrity_issues() {
        let mut doc = Document::empty();
        doc.insert("root", layout_with(&["a", "ghost", "c"]));
        doc.insert(
            "a",
            Block::Container(BlockData::new(
                None,
                Some(ContainerProps {
                    children_ids: Some(vec!["c".into(), "a".into()]),
                }),
            )),
        );
        doc.insert("c", Block::starter(BlockType::Text));

        let issues = doc.check_integrity();
        assert!(issues.contains(&IntegrityIssue::DanglingChild {
            parent: "root".into(),
            child: "ghost".into()
        }));
        assert!(issues.contains(&IntegrityIssue::MultipleParents {
            child: "c".into(),
            parents: vec!["root".into(), "a".into()]
        }));
        assert!(issues.contains(&IntegrityIssue::Cycle("a".into())));
    }

    #[test]
    fn test_root_must_be_layout() {
        let mut doc = Document::empty();
        assert_eq!(doc.check_integrity(), vec![IntegrityIssue::MissingRoot]);

        doc.insert("root", Block::starter(BlockType::Text));
        assert_eq!(
            doc.check_integrity(),
            vec![IntegrityIssue::RootNotEmailLayout(BlockType::Text)]
        );
    }

    #[test]
    fn test_orphans() {
        let mut doc = Document::empty();
        doc.insert("root", layout_with(&["kept"]));
        doc.insert("kept", Block::starter(BlockType::Text));
        doc.insert("lost", Block::starter(BlockType::Text));
        assert_eq!(doc.orphans(), vec!["lost".to_string()]);
    }
}
