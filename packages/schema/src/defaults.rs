//! Per-type default values.
//!
//! Consumers apply these when reading a block; the validator never injects
//! them into stored data.

use crate::props::{AvatarShape, ButtonSize, ButtonVariant, HeadingLevel, VerticalAlign};
use crate::style::{FontFamily, Padding, TextAlign};

pub struct ButtonDefaults {
    pub text: &'static str,
    pub url: &'static str,
    pub variant: ButtonVariant,
    pub size: ButtonSize,
    pub full_width: bool,
    pub alignment: TextAlign,
    pub background_color: &'static str,
    pub color: &'static str,
    pub border_color: &'static str,
    /// Outer spacing seeded into the style padding of a new button
    pub margin: Padding,
}

pub const BUTTON_DEFAULTS: ButtonDefaults = ButtonDefaults {
    text: "Click me",
    url: "www.creatorxg.com",
    variant: ButtonVariant::Fill,
    size: ButtonSize::Medium,
    full_width: false,
    alignment: TextAlign::Center,
    background_color: "#007bff",
    color: "#ffffff",
    border_color: "#007bff",
    margin: Padding::new(4.0, 24.0, 4.0, 24.0),
};

/// Text colour forced when a button switches to the bordered variant
pub const BORDERED_BUTTON_TEXT_COLOR: &str = "#000000";

/// Text colour forced when a button switches to the fill variant
pub const FILL_BUTTON_TEXT_COLOR: &str = "#ffffff";

pub struct HeadingDefaults {
    pub text: &'static str,
    pub rich_text: &'static str,
    pub level: HeadingLevel,
}

pub const HEADING_DEFAULTS: HeadingDefaults = HeadingDefaults {
    text: "Click to edit heading",
    rich_text: "",
    level: HeadingLevel::H2,
};

pub struct TextDefaults {
    pub rich_text: &'static str,
}

pub const TEXT_DEFAULTS: TextDefaults = TextDefaults {
    rich_text: "<p>Click to edit text</p>",
};

pub struct ImageDefaults {
    pub url: &'static str,
    pub alt: &'static str,
    pub content_alignment: VerticalAlign,
}

pub const IMAGE_DEFAULTS: ImageDefaults = ImageDefaults {
    url: "https://assets.usewaypoint.com/sample-image.jpg",
    alt: "Sample image",
    content_alignment: VerticalAlign::Middle,
};

pub struct AvatarDefaults {
    pub image_url: &'static str,
    pub size: f64,
    pub shape: AvatarShape,
}

pub const AVATAR_DEFAULTS: AvatarDefaults = AvatarDefaults {
    image_url: "https://ui-avatars.com/api/?size=128",
    size: 64.0,
    shape: AvatarShape::Square,
};

pub struct SpacerDefaults {
    pub height: f64,
}

pub const SPACER_DEFAULTS: SpacerDefaults = SpacerDefaults { height: 16.0 };

pub struct DividerDefaults {
    pub line_color: &'static str,
    pub line_height: f64,
}

pub const DIVIDER_DEFAULTS: DividerDefaults = DividerDefaults {
    line_color: "#333333",
    line_height: 1.0,
};

pub struct HtmlDefaults {
    pub contents: &'static str,
}

pub const HTML_DEFAULTS: HtmlDefaults = HtmlDefaults {
    contents: "<strong>Hello world</strong>",
};

pub struct ColumnsDefaults {
    pub columns_count: u8,
    pub columns_gap: f64,
    pub content_alignment: VerticalAlign,
}

pub const COLUMNS_DEFAULTS: ColumnsDefaults = ColumnsDefaults {
    columns_count: 2,
    columns_gap: 0.0,
    content_alignment: VerticalAlign::Middle,
};

pub struct LayoutDefaults {
    pub backdrop_color: &'static str,
    pub canvas_color: &'static str,
    pub text_color: &'static str,
    pub font_family: FontFamily,
}

pub const LAYOUT_DEFAULTS: LayoutDefaults = LayoutDefaults {
    backdrop_color: "#F5F5F5",
    canvas_color: "#FFFFFF",
    text_color: "#262626",
    font_family: FontFamily::ModernSans,
};
