//! # Block Schema Validation
//!
//! Declarative per-type schemas and the walker that checks a candidate
//! `data` value against them.
//!
//! ## Rules
//!
//! - Absent and `null` are the same thing and become `None`
//! - Unknown keys are dropped from the normalized output
//! - Every violation is collected; validation never stops at the first one
//! - Defaults are not injected (see [`crate::defaults`])

use crate::block::{Block, BlockType};
use crate::error::{FieldError, FieldIssue, SchemaError};
use crate::props::{
    AvatarShape, ButtonSize, ButtonVariant, HeadingLevel, VerticalAlign, COLUMN_SLOTS,
};
use crate::style::{FontFamily, FontWeight, TextAlign};
use serde_json::{Map, Value};
use tracing::debug;

/// Shape of a single field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Enum(&'static [&'static str]),
    IntegerEnum(&'static [i64]),
    StringList,
    /// Fixed-length list whose items are numbers or null
    OptionalNumberTuple(usize),
    Object(&'static [FieldSpec]),
    /// Fixed-length list of objects sharing one shape
    ObjectTuple(usize, &'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }
}

const PADDING_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("top", FieldKind::Number),
    FieldSpec::required("bottom", FieldKind::Number),
    FieldSpec::required("left", FieldKind::Number),
    FieldSpec::required("right", FieldKind::Number),
];

// Shared style superset
const COLOR: FieldSpec = FieldSpec::optional("color", FieldKind::String);
const BACKGROUND_COLOR: FieldSpec = FieldSpec::optional("backgroundColor", FieldKind::String);
const FONT_FAMILY: FieldSpec = FieldSpec::optional("fontFamily", FieldKind::Enum(FontFamily::TOKENS));
const FONT_SIZE: FieldSpec = FieldSpec::optional("fontSize", FieldKind::Number);
const FONT_WEIGHT: FieldSpec = FieldSpec::optional("fontWeight", FieldKind::Enum(FontWeight::TOKENS));
const TEXT_ALIGN: FieldSpec = FieldSpec::optional("textAlign", FieldKind::Enum(TextAlign::TOKENS));
const PADDING: FieldSpec = FieldSpec::optional("padding", FieldKind::Object(PADDING_FIELDS));
const BORDER_COLOR: FieldSpec = FieldSpec::optional("borderColor", FieldKind::String);
const BORDER_RADIUS: FieldSpec = FieldSpec::optional("borderRadius", FieldKind::Number);

const TEXT_STYLE: &[FieldSpec] = &[
    COLOR,
    BACKGROUND_COLOR,
    FONT_SIZE,
    FONT_FAMILY,
    FONT_WEIGHT,
    TEXT_ALIGN,
    PADDING,
];
const HEADING_STYLE: &[FieldSpec] = &[
    COLOR,
    BACKGROUND_COLOR,
    FONT_FAMILY,
    FONT_WEIGHT,
    TEXT_ALIGN,
    PADDING,
];
const BUTTON_STYLE: &[FieldSpec] = &[
    COLOR,
    BACKGROUND_COLOR,
    FONT_SIZE,
    FONT_FAMILY,
    FONT_WEIGHT,
    TEXT_ALIGN,
    PADDING,
    BORDER_COLOR,
];
const IMAGE_STYLE: &[FieldSpec] = &[BACKGROUND_COLOR, TEXT_ALIGN, PADDING];
const AVATAR_STYLE: &[FieldSpec] = &[TEXT_ALIGN, PADDING];
const CONTAINER_STYLE: &[FieldSpec] = &[BACKGROUND_COLOR, BORDER_COLOR, BORDER_RADIUS, PADDING];
const COLUMNS_STYLE: &[FieldSpec] = &[BACKGROUND_COLOR, PADDING];
const SPACER_STYLE: &[FieldSpec] = &[];
const DIVIDER_STYLE: &[FieldSpec] = &[BACKGROUND_COLOR, PADDING];
const HTML_STYLE: &[FieldSpec] = &[
    COLOR,
    BACKGROUND_COLOR,
    FONT_FAMILY,
    FONT_SIZE,
    TEXT_ALIGN,
    PADDING,
];

const TEXT_PROPS: &[FieldSpec] = &[FieldSpec::optional("richText", FieldKind::String)];
const HEADING_PROPS: &[FieldSpec] = &[
    FieldSpec::optional("text", FieldKind::String),
    FieldSpec::optional("richText", FieldKind::String),
    FieldSpec::optional("level", FieldKind::Enum(HeadingLevel::TOKENS)),
];
const BUTTON_PROPS: &[FieldSpec] = &[
    FieldSpec::optional("text", FieldKind::String),
    FieldSpec::optional("url", FieldKind::String),
    FieldSpec::optional("variant", FieldKind::Enum(ButtonVariant::TOKENS)),
    FieldSpec::optional("size", FieldKind::Enum(ButtonSize::TOKENS)),
    FieldSpec::optional("fullWidth", FieldKind::Boolean),
    FieldSpec::optional("alignment", FieldKind::Enum(TextAlign::TOKENS)),
];
const IMAGE_PROPS: &[FieldSpec] = &[
    FieldSpec::optional("url", FieldKind::String),
    FieldSpec::optional("alt", FieldKind::String),
    FieldSpec::optional("linkHref", FieldKind::String),
    FieldSpec::optional("width", FieldKind::Number),
    FieldSpec::optional("height", FieldKind::Number),
    FieldSpec::optional("contentAlignment", FieldKind::Enum(VerticalAlign::TOKENS)),
];
const AVATAR_PROPS: &[FieldSpec] = &[
    FieldSpec::optional("imageUrl", FieldKind::String),
    FieldSpec::optional("alt", FieldKind::String),
    FieldSpec::optional("size", FieldKind::Number),
    FieldSpec::optional("shape", FieldKind::Enum(AvatarShape::TOKENS)),
];
const CONTAINER_PROPS: &[FieldSpec] = &[FieldSpec::optional("childrenIds", FieldKind::StringList)];
const COLUMN_FIELDS: &[FieldSpec] = &[FieldSpec::required("childrenIds", FieldKind::StringList)];
const COLUMNS_PROPS: &[FieldSpec] = &[
    FieldSpec::optional("columnsCount", FieldKind::IntegerEnum(&[2, 3])),
    FieldSpec::optional("columnsGap", FieldKind::Number),
    FieldSpec::optional("contentAlignment", FieldKind::Enum(VerticalAlign::TOKENS)),
    FieldSpec::optional("fixedWidths", FieldKind::OptionalNumberTuple(COLUMN_SLOTS)),
    FieldSpec::required("columns", FieldKind::ObjectTuple(COLUMN_SLOTS, COLUMN_FIELDS)),
];
const SPACER_PROPS: &[FieldSpec] = &[FieldSpec::optional("height", FieldKind::Number)];
const DIVIDER_PROPS: &[FieldSpec] = &[
    FieldSpec::optional("lineColor", FieldKind::String),
    FieldSpec::optional("lineHeight", FieldKind::Number),
];
const HTML_PROPS: &[FieldSpec] = &[FieldSpec::optional("contents", FieldKind::String)];

const LAYOUT_SCHEMA: &[FieldSpec] = &[
    FieldSpec::optional("backdropColor", FieldKind::String),
    FieldSpec::optional("canvasColor", FieldKind::String),
    FieldSpec::optional("textColor", FieldKind::String),
    FieldSpec::optional("borderColor", FieldKind::String),
    FieldSpec::optional("borderRadius", FieldKind::Number),
    FieldSpec::optional("fontFamily", FieldKind::Enum(FontFamily::TOKENS)),
    FieldSpec::optional("childrenIds", FieldKind::StringList),
];

macro_rules! style_props_schema {
    ($name:ident, $style:expr, $props:expr) => {
        const $name: &[FieldSpec] = &[
            FieldSpec::optional("style", FieldKind::Object($style)),
            FieldSpec::optional("props", FieldKind::Object($props)),
        ];
    };
}

style_props_schema!(TEXT_SCHEMA, TEXT_STYLE, TEXT_PROPS);
style_props_schema!(HEADING_SCHEMA, HEADING_STYLE, HEADING_PROPS);
style_props_schema!(BUTTON_SCHEMA, BUTTON_STYLE, BUTTON_PROPS);
style_props_schema!(IMAGE_SCHEMA, IMAGE_STYLE, IMAGE_PROPS);
style_props_schema!(AVATAR_SCHEMA, AVATAR_STYLE, AVATAR_PROPS);
style_props_schema!(CONTAINER_SCHEMA, CONTAINER_STYLE, CONTAINER_PROPS);
style_props_schema!(COLUMNS_SCHEMA, COLUMNS_STYLE, COLUMNS_PROPS);
style_props_schema!(SPACER_SCHEMA, SPACER_STYLE, SPACER_PROPS);
style_props_schema!(DIVIDER_SCHEMA, DIVIDER_STYLE, DIVIDER_PROPS);
style_props_schema!(HTML_SCHEMA, HTML_STYLE, HTML_PROPS);

/// Top-level field table of a block type's `data`
pub fn schema_for(block_type: BlockType) -> &'static [FieldSpec] {
    match block_type {
        BlockType::EmailLayout => LAYOUT_SCHEMA,
        BlockType::Text => TEXT_SCHEMA,
        BlockType::Heading => HEADING_SCHEMA,
        BlockType::Button => BUTTON_SCHEMA,
        BlockType::Image => IMAGE_SCHEMA,
        BlockType::Avatar => AVATAR_SCHEMA,
        BlockType::Container => CONTAINER_SCHEMA,
        BlockType::ColumnsContainer => COLUMNS_SCHEMA,
        BlockType::Spacer => SPACER_SCHEMA,
        BlockType::Divider => DIVIDER_SCHEMA,
        BlockType::Html => HTML_SCHEMA,
    }
}

/// Style keys legal for a block type, in wire spelling
pub fn style_keys(block_type: BlockType) -> Vec<&'static str> {
    schema_for(block_type)
        .iter()
        .find(|spec| spec.name == "style")
        .map(|spec| match spec.kind {
            FieldKind::Object(fields) => fields.iter().map(|f| f.name).collect(),
            _ => Vec::new(),
        })
        .unwrap_or_default()
}

/// Validate candidate `data` for a block type.
///
/// On success the result is the typed, normalized block. On failure every
/// violated path is listed.
pub fn validate(block_type: BlockType, data: &Value) -> Result<Block, SchemaError> {
    let mut walker = Walker::default();
    let normalized = walker.object(schema_for(block_type), data, "");

    if !walker.errors.is_empty() {
        debug!(%block_type, errors = walker.errors.len(), "block data rejected");
        return Err(SchemaError {
            block_type,
            errors: walker.errors,
        });
    }

    build(block_type, Value::Object(normalized)).map_err(|_| SchemaError {
        block_type,
        errors: vec![FieldError::new(
            "",
            FieldIssue::WrongType {
                expected: "schema-conformant data",
            },
        )],
    })
}

/// Validate a complete `{type, data}` value
pub fn validate_block(value: Value) -> Result<Block, crate::error::BlockError> {
    Block::try_from(value)
}

fn build(block_type: BlockType, data: Value) -> Result<Block, serde_json::Error> {
    Ok(match block_type {
        BlockType::EmailLayout => Block::EmailLayout(serde_json::from_value(data)?),
        BlockType::Text => Block::Text(serde_json::from_value(data)?),
        BlockType::Heading => Block::Heading(serde_json::from_value(data)?),
        BlockType::Button => Block::Button(serde_json::from_value(data)?),
        BlockType::Image => Block::Image(serde_json::from_value(data)?),
        BlockType::Avatar => Block::Avatar(serde_json::from_value(data)?),
        BlockType::Container => Block::Container(serde_json::from_value(data)?),
        BlockType::ColumnsContainer => Block::ColumnsContainer(serde_json::from_value(data)?),
        BlockType::Spacer => Block::Spacer(serde_json::from_value(data)?),
        BlockType::Divider => Block::Divider(serde_json::from_value(data)?),
        BlockType::Html => Block::Html(serde_json::from_value(data)?),
    })
}

fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

#[derive(Default)]
struct Walker {
    errors: Vec<FieldError>,
}

impl Walker {
    fn fail(&mut self, path: &str, issue: FieldIssue) {
        self.errors.push(FieldError::new(path, issue));
    }

    fn object(&mut self, fields: &[FieldSpec], value: &Value, path: &str) -> Map<String, Value> {
        let mut out = Map::new();
        let Some(map) = value.as_object() else {
            self.fail(path, FieldIssue::WrongType { expected: "object" });
            return out;
        };

        for spec in fields {
            let field_path = join_path(path, spec.name);
            match map.get(spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        self.fail(&field_path, FieldIssue::Required);
                    }
                }
                Some(field) => {
                    if let Some(normalized) = self.kind(spec.kind, field, &field_path) {
                        out.insert(spec.name.to_string(), normalized);
                    }
                }
            }
        }

        out
    }

    fn kind(&mut self, kind: FieldKind, value: &Value, path: &str) -> Option<Value> {
        match kind {
            FieldKind::String => self.expect(value.is_string(), value, path, "string"),
            FieldKind::Number => self.expect(value.is_number(), value, path, "number"),
            FieldKind::Boolean => self.expect(value.is_boolean(), value, path, "boolean"),
            FieldKind::Enum(allowed) => match value.as_str() {
                Some(token) if allowed.contains(&token) => Some(value.clone()),
                _ => {
                    self.fail(
                        path,
                        FieldIssue::NotInEnum {
                            allowed: allowed.iter().map(|a| a.to_string()).collect(),
                        },
                    );
                    None
                }
            },
            FieldKind::IntegerEnum(allowed) => {
                let matched = value
                    .as_f64()
                    .and_then(|n| allowed.iter().copied().find(|a| *a as f64 == n));
                match matched {
                    Some(n) => Some(Value::from(n)),
                    None => {
                        self.fail(
                            path,
                            FieldIssue::NotInEnum {
                                allowed: allowed.iter().map(|a| a.to_string()).collect(),
                            },
                        );
                        None
                    }
                }
            }
            FieldKind::StringList => {
                let items = self.list(value, path, None)?;
                let mut ok = true;
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        self.fail(
                            &join_path(path, &i.to_string()),
                            FieldIssue::WrongType { expected: "string" },
                        );
                        ok = false;
                    }
                }
                ok.then(|| value.clone())
            }
            FieldKind::OptionalNumberTuple(len) => {
                let items = self.list(value, path, Some(len))?;
                let mut ok = true;
                for (i, item) in items.iter().enumerate() {
                    if !(item.is_number() || item.is_null()) {
                        self.fail(
                            &join_path(path, &i.to_string()),
                            FieldIssue::WrongType {
                                expected: "number or null",
                            },
                        );
                        ok = false;
                    }
                }
                ok.then(|| value.clone())
            }
            FieldKind::Object(fields) => {
                let before = self.errors.len();
                let normalized = self.object(fields, value, path);
                (self.errors.len() == before).then_some(Value::Object(normalized))
            }
            FieldKind::ObjectTuple(len, fields) => {
                let items = self.list(value, path, Some(len))?;
                let before = self.errors.len();
                let normalized: Vec<Value> = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        Value::Object(self.object(fields, item, &join_path(path, &i.to_string())))
                    })
                    .collect();
                (self.errors.len() == before).then_some(Value::Array(normalized))
            }
        }
    }

    fn expect(&mut self, ok: bool, value: &Value, path: &str, expected: &'static str) -> Option<Value> {
        if ok {
            Some(value.clone())
        } else {
            self.fail(path, FieldIssue::WrongType { expected });
            None
        }
    }

    fn list<'v>(&mut self, value: &'v Value, path: &str, len: Option<usize>) -> Option<&'v Vec<Value>> {
        let Some(items) = value.as_array() else {
            self.fail(path, FieldIssue::WrongType { expected: "array" });
            return None;
        };
        if let Some(expected) = len {
            if items.len() != expected {
                self.fail(
                    path,
                    FieldIssue::WrongLength {
                        expected,
                        found: items.len(),
                    },
                );
                return None;
            }
        }
        Some(items)
    }
}
