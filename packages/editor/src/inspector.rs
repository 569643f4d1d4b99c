//! # Inspector Panels
//!
//! Commit cycle shared by the desktop sidebar and the mobile toolbars.
//!
//! A panel edits one block. Each edit builds a candidate `data` value,
//! validates it against the block's schema and, on success, replaces the
//! entry through `set_document`. On failure the stored block is left alone
//! and the error is kept for display.

use crate::errors::EditorError;
use crate::store::EditorStore;
use mailframe_schema::defaults::{BORDERED_BUTTON_TEXT_COLOR, FILL_BUTTON_TEXT_COLOR};
use mailframe_schema::{
    style_keys, validate, Block, BlockId, BlockType, ButtonVariant, FontWeight, HeadingLevel, Padding,
    SchemaError,
};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct BlockPanel {
    block_id: BlockId,
    block_type: BlockType,
    last_error: Option<SchemaError>,
}

impl BlockPanel {
    /// Panel for a specific block
    pub fn new(store: &EditorStore, block_id: impl Into<BlockId>) -> Result<Self, EditorError> {
        let block_id = block_id.into();
        let block = store
            .document()
            .get(&block_id)
            .ok_or_else(|| EditorError::BlockNotFound(block_id.clone()))?;
        Ok(Self {
            block_type: block.block_type(),
            block_id,
            last_error: None,
        })
    }

    /// Panel for whatever is selected
    pub fn for_selection(store: &EditorStore) -> Result<Self, EditorError> {
        let id = store
            .selected_block_id()
            .ok_or(EditorError::NothingSelected)?;
        Self::new(store, id)
    }

    pub fn block_id(&self) -> &str {
        &self.block_id
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    /// Error from the last rejected commit, cleared by a successful one
    pub fn last_error(&self) -> Option<&SchemaError> {
        self.last_error.as_ref()
    }

    fn current<'s>(&self, store: &'s EditorStore) -> Result<&'s Block, EditorError> {
        let block = store
            .document()
            .get(&self.block_id)
            .ok_or_else(|| EditorError::BlockNotFound(self.block_id.clone()))?;
        if block.block_type() != self.block_type {
            return Err(EditorError::TypeMismatch {
                id: self.block_id.clone(),
                expected: self.block_type,
                found: block.block_type(),
            });
        }
        Ok(block)
    }

    /// Validate a full candidate `data` value and commit it
    pub fn commit(&mut self, store: &mut EditorStore, candidate: &Value) -> Result<(), EditorError> {
        self.current(store)?;
        match validate(self.block_type, candidate) {
            Ok(block) => {
                debug!(block_id = %self.block_id, "panel commit");
                self.last_error = None;
                store.set_document([(self.block_id.clone(), block)]);
                Ok(())
            }
            Err(err) => {
                warn!(block_id = %self.block_id, error = %err, "panel commit rejected");
                self.last_error = Some(err.clone());
                Err(err.into())
            }
        }
    }

    /// Shallow-merge `patch` into one section (`style` or `props`) of the
    /// current data, then commit
    fn patch_section(
        &mut self,
        store: &mut EditorStore,
        section: &str,
        patch: Map<String, Value>,
    ) -> Result<(), EditorError> {
        let mut data = self.current(store)?.data_value();
        let Some(object) = data.as_object_mut() else {
            return Err(EditorError::BlockNotFound(self.block_id.clone()));
        };
        let target = object
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !target.is_object() {
            *target = Value::Object(Map::new());
        }
        if let Value::Object(fields) = target {
            fields.extend(patch);
        }
        self.commit(store, &data)
    }

    /// Merge into `style`. Keys the block type has no use for are refused
    /// instead of being stripped by validation.
    pub fn patch_style(
        &mut self,
        store: &mut EditorStore,
        patch: Map<String, Value>,
    ) -> Result<(), EditorError> {
        let allowed = style_keys(self.block_type);
        if let Some(key) = patch.keys().find(|key| !allowed.contains(&key.as_str())) {
            warn!(block_id = %self.block_id, %key, "style key not allowed");
            return Err(EditorError::StyleKeyNotAllowed {
                block_type: self.block_type,
                key: key.clone(),
            });
        }
        self.patch_section(store, "style", patch)
    }

    pub fn patch_props(
        &mut self,
        store: &mut EditorStore,
        patch: Map<String, Value>,
    ) -> Result<(), EditorError> {
        self.patch_section(store, "props", patch)
    }

    /// Text colour. Dividers store it as their line colour.
    pub fn set_text_color(&mut self, store: &mut EditorStore, color: &str) -> Result<(), EditorError> {
        if self.block_type == BlockType::Divider {
            self.patch_props(store, object(json!({ "lineColor": color })))
        } else {
            self.patch_style(store, object(json!({ "color": color })))
        }
    }

    /// Background colour. A bordered button has no fill, so its border
    /// colour changes instead.
    pub fn set_background_color(
        &mut self,
        store: &mut EditorStore,
        color: &str,
    ) -> Result<(), EditorError> {
        if self.button_variant(store)? == Some(ButtonVariant::Bordered) {
            self.patch_style(store, object(json!({ "borderColor": color })))
        } else {
            self.patch_style(store, object(json!({ "backgroundColor": color })))
        }
    }

    pub fn set_border_color(&mut self, store: &mut EditorStore, color: &str) -> Result<(), EditorError> {
        self.patch_style(store, object(json!({ "borderColor": color })))
    }

    /// Font size. Headings size themselves from their level.
    pub fn set_font_size(&mut self, store: &mut EditorStore, size: f64) -> Result<(), EditorError> {
        if self.block_type == BlockType::Heading {
            return Err(EditorError::Unsupported {
                block_type: self.block_type,
                what: "font size",
            });
        }
        self.patch_style(store, object(json!({ "fontSize": size })))
    }

    pub fn toggle_font_weight(&mut self, store: &mut EditorStore) -> Result<(), EditorError> {
        let bold = self
            .current(store)?
            .style()
            .and_then(|style| style.font_weight)
            == Some(FontWeight::Bold);
        let next = if bold { "normal" } else { "bold" };
        self.patch_style(store, object(json!({ "fontWeight": next })))
    }

    pub fn set_padding(&mut self, store: &mut EditorStore, padding: Padding) -> Result<(), EditorError> {
        self.patch_style(store, object(json!({ "padding": padding })))
    }

    pub fn set_heading_level(
        &mut self,
        store: &mut EditorStore,
        level: HeadingLevel,
    ) -> Result<(), EditorError> {
        self.require(BlockType::Heading, "heading levels")?;
        self.patch_props(store, object(json!({ "level": level })))
    }

    /// Switch a button's variant, forcing the text colour that reads on it.
    /// Choosing the current variant changes nothing.
    pub fn set_button_variant(
        &mut self,
        store: &mut EditorStore,
        variant: ButtonVariant,
    ) -> Result<(), EditorError> {
        self.require(BlockType::Button, "variants")?;
        let current = self.button_variant(store)?.unwrap_or(ButtonVariant::Fill);
        if current == variant {
            return Ok(());
        }

        let color = match variant {
            ButtonVariant::Bordered => BORDERED_BUTTON_TEXT_COLOR,
            ButtonVariant::Fill => FILL_BUTTON_TEXT_COLOR,
        };
        let mut data = self.current(store)?.data_value();
        data["props"]["variant"] = json!(variant);
        data["style"]["color"] = json!(color);
        self.commit(store, &data)
    }

    fn button_variant(&self, store: &EditorStore) -> Result<Option<ButtonVariant>, EditorError> {
        Ok(match self.current(store)? {
            Block::Button(data) => data.props.as_ref().and_then(|props| props.variant),
            _ => None,
        })
    }

    fn require(&self, block_type: BlockType, what: &'static str) -> Result<(), EditorError> {
        if self.block_type == block_type {
            Ok(())
        } else {
            Err(EditorError::Unsupported {
                block_type: self.block_type,
                what,
            })
        }
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailframe_schema::{Document, TextAlign};

    fn store_with(id: &str, block: Block) -> EditorStore {
        let mut doc = Document::default();
        doc.insert(id, block);
        let mut store = EditorStore::new(doc);
        store.set_selected_block_id(Some(id.to_string()));
        store
    }

    #[test]
    fn test_rejected_commit_keeps_previous_value() {
        let mut store = store_with("b", Block::starter(BlockType::Button));
        let before = store.document().clone();
        let mut panel = BlockPanel::for_selection(&store).unwrap();

        let err = panel.patch_props(&mut store, object(json!({"variant": "ghost"})));
        assert!(matches!(err, Err(EditorError::Schema(_))));
        assert_eq!(*store.document(), before);
        assert!(panel.last_error().unwrap().has_path("props.variant"));

        panel
            .patch_props(&mut store, object(json!({"text": "Buy now"})))
            .unwrap();
        assert!(panel.last_error().is_none());
    }

    #[test]
    fn test_style_patch_merges() {
        let mut store = store_with("t", Block::starter(BlockType::Text));
        let mut panel = BlockPanel::new(&store, "t").unwrap();
        panel
            .patch_style(&mut store, object(json!({"textAlign": "right"})))
            .unwrap();

        let style = store.document().get("t").unwrap().style().unwrap().clone();
        assert_eq!(style.text_align, Some(TextAlign::Right));
        // Untouched keys survive
        assert!(style.padding.is_some());
    }

    #[test]
    fn test_button_variant_switch_sets_text_color() {
        let mut store = store_with("b", Block::starter(BlockType::Button));
        let mut panel = BlockPanel::new(&store, "b").unwrap();

        panel
            .set_button_variant(&mut store, ButtonVariant::Bordered)
            .unwrap();
        let block = store.document().get("b").unwrap();
        assert_eq!(block.style().unwrap().color.as_deref(), Some("#000000"));

        panel.set_background_color(&mut store, "#ff0000").unwrap();
        let style = store.document().get("b").unwrap().style().unwrap().clone();
        assert_eq!(style.border_color.as_deref(), Some("#ff0000"));
        assert_ne!(style.background_color.as_deref(), Some("#ff0000"));

        panel.set_button_variant(&mut store, ButtonVariant::Fill).unwrap();
        let block = store.document().get("b").unwrap();
        assert_eq!(block.style().unwrap().color.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_same_variant_is_noop() {
        let mut store = store_with("b", Block::starter(BlockType::Button));
        let version = store.version();
        let mut panel = BlockPanel::new(&store, "b").unwrap();
        panel.set_button_variant(&mut store, ButtonVariant::Fill).unwrap();
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_divider_text_color_goes_to_line_color() {
        let mut store = store_with("d", Block::starter(BlockType::Divider));
        let mut panel = BlockPanel::new(&store, "d").unwrap();
        panel.set_text_color(&mut store, "#abcdef").unwrap();

        let data = store.document().get("d").unwrap().data_value();
        assert_eq!(data["props"]["lineColor"], "#abcdef");
    }

    #[test]
    fn test_heading_level_and_font_size() {
        let mut store = store_with("h", Block::starter(BlockType::Heading));
        let mut panel = BlockPanel::new(&store, "h").unwrap();
        panel.set_heading_level(&mut store, HeadingLevel::H1).unwrap();
        let data = store.document().get("h").unwrap().data_value();
        assert_eq!(data["props"]["level"], "h1");

        assert!(matches!(
            panel.set_font_size(&mut store, 30.0),
            Err(EditorError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_padding_and_weight() {
        let mut store = store_with("t", Block::starter(BlockType::Text));
        let mut panel = BlockPanel::new(&store, "t").unwrap();
        panel.set_padding(&mut store, Padding::uniform(8.0)).unwrap();
        panel.toggle_font_weight(&mut store).unwrap();

        let style = store.document().get("t").unwrap().style().unwrap().clone();
        assert_eq!(style.padding, Some(Padding::uniform(8.0)));
        assert_eq!(style.font_weight.map(|w| w.as_css()), Some("bold"));
    }

    #[test]
    fn test_style_keys_outside_schema_are_refused() {
        let mut store = store_with("s", Block::starter(BlockType::Spacer));
        let version = store.version();
        let mut panel = BlockPanel::new(&store, "s").unwrap();
        let err = panel.set_background_color(&mut store, "#ff0000").unwrap_err();
        assert!(matches!(
            err,
            EditorError::StyleKeyNotAllowed { block_type: BlockType::Spacer, ref key } if key == "backgroundColor"
        ));
        assert_eq!(store.version(), version);

        let mut store = store_with("h", Block::starter(BlockType::Html));
        let version = store.version();
        let mut panel = BlockPanel::new(&store, "h").unwrap();
        assert!(matches!(
            panel.toggle_font_weight(&mut store),
            Err(EditorError::StyleKeyNotAllowed { .. })
        ));
        assert_eq!(store.version(), version);
        assert!(store.document().get("h").unwrap().style().unwrap().font_weight.is_none());
    }

    #[test]
    fn test_nothing_selected() {
        let store = EditorStore::default();
        assert!(matches!(
            BlockPanel::for_selection(&store),
            Err(EditorError::NothingSelected)
        ));
    }
}
