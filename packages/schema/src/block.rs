//! Typed block model.
//!
//! A [`Block`] is a closed sum over every block type the editor knows. The
//! wire form is `{"type": "<Tag>", "data": {...}}`. Deserialization runs the
//! schema validator, so a decoded block is always schema-valid.

use crate::defaults::{
    AVATAR_DEFAULTS, BUTTON_DEFAULTS, DIVIDER_DEFAULTS, HEADING_DEFAULTS, HTML_DEFAULTS,
    IMAGE_DEFAULTS, LAYOUT_DEFAULTS, SPACER_DEFAULTS, TEXT_DEFAULTS,
};
use crate::document::BlockId;
use crate::error::BlockError;
use crate::props::*;
use crate::style::{BlockStyle, FontFamily, FontWeight, Padding, TextAlign};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag identifying a block's schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockType {
    EmailLayout,
    Text,
    Heading,
    Button,
    Image,
    Avatar,
    Container,
    ColumnsContainer,
    Spacer,
    Divider,
    Html,
}

impl BlockType {
    pub const ALL: [BlockType; 11] = [
        BlockType::EmailLayout,
        BlockType::Text,
        BlockType::Heading,
        BlockType::Button,
        BlockType::Image,
        BlockType::Avatar,
        BlockType::Container,
        BlockType::ColumnsContainer,
        BlockType::Spacer,
        BlockType::Divider,
        BlockType::Html,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::EmailLayout => "EmailLayout",
            BlockType::Text => "Text",
            BlockType::Heading => "Heading",
            BlockType::Button => "Button",
            BlockType::Image => "Image",
            BlockType::Avatar => "Avatar",
            BlockType::Container => "Container",
            BlockType::ColumnsContainer => "ColumnsContainer",
            BlockType::Spacer => "Spacer",
            BlockType::Divider => "Divider",
            BlockType::Html => "Html",
        }
    }

    /// Whether blocks of this type own child-id lists
    pub fn is_container(self) -> bool {
        matches!(
            self,
            BlockType::EmailLayout | BlockType::Container | BlockType::ColumnsContainer
        )
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BlockError::UnknownType(s.to_string()))
    }
}

/// `{style, props}` payload shared by every non-layout block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockData<P> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BlockStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<P>,
}

impl<P> Default for BlockData<P> {
    fn default() -> Self {
        Self {
            style: None,
            props: None,
        }
    }
}

impl<P> BlockData<P> {
    pub fn new(style: Option<BlockStyle>, props: Option<P>) -> Self {
        Self { style, props }
    }
}

/// Data of the root layout block. Unlike other blocks it is flat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLayoutData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_ids: Option<Vec<BlockId>>,
}

/// A schema-valid block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", try_from = "serde_json::Value")]
pub enum Block {
    EmailLayout(EmailLayoutData),
    Text(BlockData<TextProps>),
    Heading(BlockData<HeadingProps>),
    Button(BlockData<ButtonProps>),
    Image(BlockData<ImageProps>),
    Avatar(BlockData<AvatarProps>),
    Container(BlockData<ContainerProps>),
    ColumnsContainer(BlockData<ColumnsContainerProps>),
    Spacer(BlockData<SpacerProps>),
    Divider(BlockData<DividerProps>),
    Html(BlockData<HtmlProps>),
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        match self {
            Block::EmailLayout(_) => BlockType::EmailLayout,
            Block::Text(_) => BlockType::Text,
            Block::Heading(_) => BlockType::Heading,
            Block::Button(_) => BlockType::Button,
            Block::Image(_) => BlockType::Image,
            Block::Avatar(_) => BlockType::Avatar,
            Block::Container(_) => BlockType::Container,
            Block::ColumnsContainer(_) => BlockType::ColumnsContainer,
            Block::Spacer(_) => BlockType::Spacer,
            Block::Divider(_) => BlockType::Divider,
            Block::Html(_) => BlockType::Html,
        }
    }

    /// Style record, if the block has one. The layout block never does.
    pub fn style(&self) -> Option<&BlockStyle> {
        match self {
            Block::EmailLayout(_) => None,
            Block::Text(d) => d.style.as_ref(),
            Block::Heading(d) => d.style.as_ref(),
            Block::Button(d) => d.style.as_ref(),
            Block::Image(d) => d.style.as_ref(),
            Block::Avatar(d) => d.style.as_ref(),
            Block::Container(d) => d.style.as_ref(),
            Block::ColumnsContainer(d) => d.style.as_ref(),
            Block::Spacer(d) => d.style.as_ref(),
            Block::Divider(d) => d.style.as_ref(),
            Block::Html(d) => d.style.as_ref(),
        }
    }

    /// The `data` half of the wire form
    pub fn data_value(&self) -> serde_json::Value {
        let value = match self {
            Block::EmailLayout(d) => serde_json::to_value(d),
            Block::Text(d) => serde_json::to_value(d),
            Block::Heading(d) => serde_json::to_value(d),
            Block::Button(d) => serde_json::to_value(d),
            Block::Image(d) => serde_json::to_value(d),
            Block::Avatar(d) => serde_json::to_value(d),
            Block::Container(d) => serde_json::to_value(d),
            Block::ColumnsContainer(d) => serde_json::to_value(d),
            Block::Spacer(d) => serde_json::to_value(d),
            Block::Divider(d) => serde_json::to_value(d),
            Block::Html(d) => serde_json::to_value(d),
        };
        // Plain structs of strings, numbers and enums always serialize.
        value.unwrap_or(serde_json::Value::Null)
    }

    /// Payload inserted by the add-block menu for a given type
    pub fn starter(block_type: BlockType) -> Block {
        let padded = |padding: Padding| BlockStyle {
            padding: Some(padding),
            ..BlockStyle::default()
        };
        let standard = Padding::new(16.0, 24.0, 16.0, 24.0);

        match block_type {
            BlockType::EmailLayout => Block::EmailLayout(EmailLayoutData {
                backdrop_color: Some(LAYOUT_DEFAULTS.backdrop_color.to_string()),
                canvas_color: Some(LAYOUT_DEFAULTS.canvas_color.to_string()),
                text_color: Some(LAYOUT_DEFAULTS.text_color.to_string()),
                font_family: Some(LAYOUT_DEFAULTS.font_family),
                children_ids: Some(Vec::new()),
                ..EmailLayoutData::default()
            }),
            BlockType::Text => Block::Text(BlockData::new(
                Some(BlockStyle {
                    font_weight: Some(FontWeight::Normal),
                    ..padded(standard)
                }),
                Some(TextProps {
                    rich_text: Some(TEXT_DEFAULTS.rich_text.to_string()),
                }),
            )),
            BlockType::Heading => Block::Heading(BlockData::new(
                Some(padded(standard)),
                Some(HeadingProps {
                    text: Some(HEADING_DEFAULTS.text.to_string()),
                    rich_text: None,
                    level: Some(HEADING_DEFAULTS.level),
                }),
            )),
            BlockType::Button => Block::Button(BlockData::new(
                Some(BlockStyle {
                    color: Some(BUTTON_DEFAULTS.color.to_string()),
                    background_color: Some(BUTTON_DEFAULTS.background_color.to_string()),
                    border_color: Some(BUTTON_DEFAULTS.border_color.to_string()),
                    ..padded(BUTTON_DEFAULTS.margin)
                }),
                Some(ButtonProps {
                    text: Some(BUTTON_DEFAULTS.text.to_string()),
                    url: Some(BUTTON_DEFAULTS.url.to_string()),
                    variant: Some(BUTTON_DEFAULTS.variant),
                    size: Some(BUTTON_DEFAULTS.size),
                    full_width: Some(BUTTON_DEFAULTS.full_width),
                    alignment: Some(BUTTON_DEFAULTS.alignment),
                }),
            )),
            BlockType::Image => Block::Image(BlockData::new(
                Some(padded(standard)),
                Some(ImageProps {
                    url: Some(IMAGE_DEFAULTS.url.to_string()),
                    alt: Some(IMAGE_DEFAULTS.alt.to_string()),
                    content_alignment: Some(IMAGE_DEFAULTS.content_alignment),
                    ..ImageProps::default()
                }),
            )),
            BlockType::Avatar => Block::Avatar(BlockData::new(
                Some(BlockStyle {
                    text_align: Some(TextAlign::Center),
                    ..padded(standard)
                }),
                Some(AvatarProps {
                    image_url: Some(AVATAR_DEFAULTS.image_url.to_string()),
                    alt: None,
                    size: Some(AVATAR_DEFAULTS.size),
                    shape: Some(AVATAR_DEFAULTS.shape),
                }),
            )),
            BlockType::Container => Block::Container(BlockData::new(
                Some(padded(standard)),
                Some(ContainerProps {
                    children_ids: Some(Vec::new()),
                }),
            )),
            BlockType::ColumnsContainer => Block::ColumnsContainer(BlockData::new(
                Some(padded(standard)),
                Some(ColumnsContainerProps {
                    columns_count: Some(3),
                    ..ColumnsContainerProps::default()
                }),
            )),
            BlockType::Spacer => Block::Spacer(BlockData::new(
                None,
                Some(SpacerProps {
                    height: Some(SPACER_DEFAULTS.height),
                }),
            )),
            BlockType::Divider => Block::Divider(BlockData::new(
                Some(padded(Padding::new(16.0, 0.0, 16.0, 0.0))),
                Some(DividerProps {
                    line_color: Some(DIVIDER_DEFAULTS.line_color.to_string()),
                    line_height: Some(DIVIDER_DEFAULTS.line_height),
                }),
            )),
            BlockType::Html => Block::Html(BlockData::new(
                Some(BlockStyle {
                    font_size: Some(16.0),
                    ..padded(standard)
                }),
                Some(HtmlProps {
                    contents: Some(HTML_DEFAULTS.contents.to_string()),
                }),
            )),
        }
    }
}

impl TryFrom<serde_json::Value> for Block {
    type Error = BlockError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let object = value.as_object().ok_or(BlockError::NotAnObject)?;
        let tag = object
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or(BlockError::MissingType)?;
        let block_type: BlockType = tag.parse()?;
        let data = object
            .get("data")
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

        Ok(crate::validate::validate(block_type, &data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_round_trips_through_str() {
        for block_type in BlockType::ALL {
            let parsed: BlockType = block_type.as_str().parse().unwrap();
            assert_eq!(parsed, block_type);
        }
        assert!("Paragraph".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_wire_form_uses_type_and_data() {
        let block = Block::Spacer(BlockData::new(
            None,
            Some(SpacerProps { height: Some(24.0) }),
        ));
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "Spacer", "data": {"props": {"height": 24.0}}})
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let bad = serde_json::json!({
            "type": "Button",
            "data": {"props": {"variant": "ghost"}}
        });
        assert!(serde_json::from_value::<Block>(bad).is_err());

        let good = serde_json::json!({
            "type": "Button",
            "data": {"props": {"variant": "bordered", "text": "Go"}}
        });
        let block: Block = serde_json::from_value(good).unwrap();
        assert_eq!(block.block_type(), BlockType::Button);
    }

    #[test]
    fn test_every_starter_is_schema_valid() {
        for block_type in BlockType::ALL {
            let block = Block::starter(block_type);
            let reparsed = crate::validate::validate(block_type, &block.data_value()).unwrap();
            assert_eq!(reparsed, block, "starter for {block_type} must validate");
        }
    }

    #[test]
    fn test_only_containers_report_container() {
        let containers: Vec<_> = BlockType::ALL
            .into_iter()
            .filter(|t| t.is_container())
            .collect();
        assert_eq!(
            containers,
            vec![
                BlockType::EmailLayout,
                BlockType::Container,
                BlockType::ColumnsContainer
            ]
        );
    }
}
