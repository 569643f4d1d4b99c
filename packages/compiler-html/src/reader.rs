//! Reader-compatibility pass.
//!
//! The static renderer understands fewer features than the editor. Before
//! compiling, blocks it cannot draw faithfully are rewritten: deep heading
//! levels collapse to `h3`, and buttons become raw HTML with email-safe
//! markup. Preview mode also turns text and headings into raw HTML.

use crate::css::Declarations;
use mailframe_schema::defaults::BUTTON_DEFAULTS;
use mailframe_schema::{
    Block, BlockData, BlockStyle, ButtonProps, ButtonSize, ButtonVariant, Document, HeadingLevel,
    HeadingProps, HtmlProps, Padding, TextAlign, TextProps,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderMode {
    /// Output handed to the host on every change
    #[default]
    Export,
    /// Preview tab: text and headings are emitted verbatim as HTML too
    Preview,
}

/// Margins used around a converted button when its padding is absent or zero
const BUTTON_FALLBACK_MARGIN: Padding = Padding::new(4.0, 8.0, 4.0, 8.0);
const BUTTON_FALLBACK_FONT: &str = "Arial, sans-serif";
const BUTTON_FALLBACK_WEIGHT: &str = "500";

/// Copy of `document` rewritten for the static renderer. Ids and order are
/// unchanged.
pub fn prepare_for_reader(document: &Document, mode: ReaderMode) -> Document {
    document
        .iter()
        .map(|(id, block)| (id.clone(), convert_block(block, mode)))
        .collect()
}

fn convert_block(block: &Block, mode: ReaderMode) -> Block {
    match (block, mode) {
        (Block::Button(data), _) => Block::Html(BlockData::new(
            Some(BlockStyle::default()),
            Some(HtmlProps {
                contents: Some(button_html(data)),
            }),
        )),
        (Block::Heading(data), ReaderMode::Preview) => {
            let props = data.props.clone().unwrap_or_default();
            let level = props.level.unwrap_or(HeadingLevel::H2).tag();
            let text = props.text.unwrap_or_default();
            html_block(data.style.as_ref(), format!("<{level}>{text}</{level}>"))
        }
        (Block::Text(data), ReaderMode::Preview) => {
            let TextProps { rich_text } = data.props.clone().unwrap_or_default();
            html_block(data.style.as_ref(), rich_text.unwrap_or_default())
        }
        (Block::Heading(data), ReaderMode::Export) => {
            let deep = matches!(
                data.props.as_ref().and_then(|p| p.level),
                Some(HeadingLevel::H4 | HeadingLevel::H5 | HeadingLevel::H6)
            );
            if !deep {
                return block.clone();
            }
            let mut data = data.clone();
            data.props = Some(HeadingProps {
                level: Some(HeadingLevel::H3),
                ..data.props.unwrap_or_default()
            });
            Block::Heading(data)
        }
        _ => block.clone(),
    }
}

/// Html block keeping only the style keys Html accepts
fn html_block(style: Option<&BlockStyle>, contents: String) -> Block {
    let style = style.map(|style| BlockStyle {
        font_weight: None,
        border_color: None,
        border_radius: None,
        ..style.clone()
    });
    Block::Html(BlockData::new(
        style,
        Some(HtmlProps {
            contents: Some(contents),
        }),
    ))
}

/// Email-safe markup for a button. Block padding becomes the outer margin;
/// the face padding comes from the size.
pub fn button_html(data: &BlockData<ButtonProps>) -> String {
    let props = data.props.clone().unwrap_or_default();
    let style = data.style.clone().unwrap_or_default();

    let text = props.text.unwrap_or_else(|| BUTTON_DEFAULTS.text.to_string());
    let url = props.url.unwrap_or_else(|| BUTTON_DEFAULTS.url.to_string());
    let variant = props.variant.unwrap_or(ButtonVariant::Fill);
    let size = props.size.unwrap_or(ButtonSize::Medium);
    let full_width = props.full_width.unwrap_or(false);
    let alignment = props.alignment.unwrap_or(TextAlign::Left);

    let background = style
        .background_color
        .clone()
        .unwrap_or_else(|| BUTTON_DEFAULTS.background_color.to_string());
    let color = style
        .color
        .clone()
        .unwrap_or_else(|| BUTTON_DEFAULTS.color.to_string());
    let font_family = style
        .font_family
        .map(|family| family.css_stack())
        .unwrap_or(BUTTON_FALLBACK_FONT);
    let font_size = format!("{}px", style.font_size.unwrap_or_else(|| size.font_size()));
    let font_weight = style
        .font_weight
        .map(|weight| weight.as_css())
        .unwrap_or(BUTTON_FALLBACK_WEIGHT);
    let margin = button_margin(style.padding);

    let face_background = match variant {
        ButtonVariant::Fill => background.clone(),
        ButtonVariant::Bordered => "transparent".to_string(),
    };
    let border = match variant {
        ButtonVariant::Bordered => {
            let border_color = style.border_color.clone().unwrap_or(background);
            format!("2px solid {}", border_color)
        }
        ButtonVariant::Fill => "none".to_string(),
    };

    let mut wrapper = Declarations::new();
    wrapper.push("text-align", alignment.as_css());
    if full_width {
        wrapper.push("width", "100%");
        wrapper.push(
            "margin",
            format!("{}px 0px {}px 0px", margin.top, margin.bottom),
        );
        wrapper.push("padding", format!("0px {}px", margin.right));
    } else {
        wrapper.push("margin", margin.to_css());
    }

    let mut link = Declarations::new();
    link.push("text-decoration", "none");
    link.push("display", if full_width { "block" } else { "inline-block" });

    let mut face = Declarations::new();
    face.push("background-color", face_background);
    face.push("color", color);
    face.push("border", border);
    face.push("border-radius", "6px");
    face.push("padding", size.padding_css());
    face.push("font-size", font_size);
    face.push("font-family", font_family);
    face.push("font-weight", font_weight);
    face.push("text-align", "center");
    face.push("cursor", "pointer");
    face.push("line-height", "1.2");
    if full_width {
        face.push("box-sizing", "border-box");
        face.push("width", "100%");
        face.push("display", "block");
    } else {
        face.push("display", "inline-block");
    }

    format!(
        r#"<div style="{}"><a href="{}" style="{}"><div style="{}">{}</div></a></div>"#,
        wrapper.to_attr(),
        html_escape::encode_double_quoted_attribute(&url),
        link.to_attr(),
        face.to_attr(),
        html_escape::encode_text(&text),
    )
}

/// Block padding as button margin. Missing or zero sides fall back.
fn button_margin(padding: Option<Padding>) -> Padding {
    let Some(padding) = padding else {
        return BUTTON_FALLBACK_MARGIN;
    };
    let pick = |value: f64, fallback: f64| if value == 0.0 { fallback } else { value };
    Padding {
        top: pick(padding.top, BUTTON_FALLBACK_MARGIN.top),
        bottom: pick(padding.bottom, BUTTON_FALLBACK_MARGIN.bottom),
        left: pick(padding.left, BUTTON_FALLBACK_MARGIN.left),
        right: pick(padding.right, BUTTON_FALLBACK_MARGIN.right),
    }
}
