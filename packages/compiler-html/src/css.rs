//! Inline `style` attribute builder.

use mailframe_schema::Padding;

/// Ordered CSS declarations for one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declarations(Vec<(&'static str, String)>);

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, property: &'static str, value: impl Into<String>) {
        self.0.push((property, value.into()));
    }

    pub fn push_opt(&mut self, property: &'static str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.push(property, value);
        }
    }

    pub fn push_px(&mut self, property: &'static str, value: Option<f64>) {
        if let Some(value) = value {
            self.push(property, format!("{}px", value));
        }
    }

    pub fn push_padding(&mut self, padding: Option<Padding>) {
        if let Some(padding) = padding {
            self.push("padding", padding.to_css());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `prop: value; ...` escaped for a double-quoted attribute
    pub fn to_attr(&self) -> String {
        let joined = self
            .0
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect::<Vec<_>>()
            .join("; ");
        html_escape::encode_double_quoted_attribute(&joined).into_owned()
    }

    /// ` style="..."`, or nothing when empty
    pub fn style_attr(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" style=\"{}\"", self.to_attr())
        }
    }
}
