//! Which toolbar controls apply to which block types.

use mailframe_schema::BlockType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleControl {
    TextColor,
    BackgroundColor,
    FontSize,
    FontFamily,
    FontWeight,
    Padding,
    ImageSettings,
    LinkSettings,
    ResponsiveLayout,
}

impl StyleControl {
    pub const ALL: [StyleControl; 9] = [
        StyleControl::TextColor,
        StyleControl::BackgroundColor,
        StyleControl::FontSize,
        StyleControl::FontFamily,
        StyleControl::FontWeight,
        StyleControl::Padding,
        StyleControl::ImageSettings,
        StyleControl::LinkSettings,
        StyleControl::ResponsiveLayout,
    ];

    /// Block types offering this control
    pub fn block_types(self) -> &'static [BlockType] {
        use BlockType::*;
        match self {
            StyleControl::TextColor => &[Text, Heading, Button, Html, Divider],
            StyleControl::BackgroundColor => &[
                Text,
                Heading,
                Button,
                Image,
                Container,
                ColumnsContainer,
                Divider,
                Html,
            ],
            StyleControl::FontSize => &[Text, Button, Html],
            StyleControl::FontFamily => &[Text, Heading, Button, Html],
            StyleControl::FontWeight => &[Button],
            StyleControl::Padding => &[
                Text,
                Heading,
                Button,
                Html,
                Container,
                ColumnsContainer,
                Image,
                Avatar,
                Divider,
            ],
            StyleControl::ImageSettings => &[Image, Avatar],
            StyleControl::LinkSettings => &[Button, Image],
            StyleControl::ResponsiveLayout => &[Image, Avatar, Text, Heading],
        }
    }

    /// Style key the control edits, if it edits one directly
    pub fn style_key(self) -> Option<&'static str> {
        match self {
            StyleControl::TextColor => Some("color"),
            StyleControl::BackgroundColor => Some("backgroundColor"),
            StyleControl::FontSize => Some("fontSize"),
            StyleControl::FontFamily => Some("fontFamily"),
            StyleControl::FontWeight => Some("fontWeight"),
            StyleControl::Padding => Some("padding"),
            _ => None,
        }
    }

    /// Controls to show for a block type, in toolbar order
    pub fn for_block(block_type: BlockType) -> Vec<StyleControl> {
        StyleControl::ALL
            .into_iter()
            .filter(|control| block_type.supports(*control))
            .collect()
    }
}

pub trait Supports {
    fn supports(self, control: StyleControl) -> bool;
}

impl Supports for BlockType {
    fn supports(self, control: StyleControl) -> bool {
        control.block_types().contains(&self)
    }
}
