use crate::css::Declarations;
use mailframe_schema::defaults::{
    AVATAR_DEFAULTS, COLUMNS_DEFAULTS, DIVIDER_DEFAULTS, HEADING_DEFAULTS, IMAGE_DEFAULTS,
    LAYOUT_DEFAULTS, SPACER_DEFAULTS,
};
use mailframe_schema::{
    AvatarShape, Block, BlockData, BlockId, BlockStyle, ButtonProps, ColumnsContainerProps,
    Document, EmailLayoutData, HeadingProps, ImageProps,
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur during HTML compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Root block not found: {0}")]
    MissingRoot(BlockId),
}

/// Options for HTML compilation
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Wrap output in `<!DOCTYPE html>`, `<head>` and `<body>`
    pub full_document: bool,
    /// Canvas width in pixels
    pub max_width: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            full_document: true,
            max_width: 600,
        }
    }
}

struct Context<'a> {
    options: &'a CompileOptions,
    document: &'a Document,
    depth: usize,
    buffer: String,
    /// Ids currently being emitted, for cycle detection
    path: Vec<&'a str>,
}

impl<'a> Context<'a> {
    fn new(options: &'a CompileOptions, document: &'a Document) -> Self {
        Self {
            options,
            document,
            depth: 0,
            buffer: String::new(),
            path: Vec::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile the tree under `root_id` to email HTML
#[instrument(skip(document, options), fields(blocks = document.len()))]
pub fn compile_to_html(
    document: &Document,
    root_id: &str,
    options: &CompileOptions,
) -> Result<String, CompileError> {
    if !document.contains(root_id) {
        return Err(CompileError::MissingRoot(root_id.to_string()));
    }

    let mut ctx = Context::new(options, document);

    if options.full_document {
        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line("<html>");
        ctx.indent();
        compile_head(&mut ctx);
        ctx.add_line("<body style=\"margin: 0; padding: 0\">");
        ctx.indent();
    }

    compile_block(root_id, &mut ctx);

    if options.full_document {
        ctx.dedent();
        ctx.add_line("</body>");
        ctx.dedent();
        ctx.add_line("</html>");
    }

    let html = ctx.get_output();
    debug!(bytes = html.len(), "compiled document");
    Ok(html)
}

fn compile_head(ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_block<'a>(id: &'a str, ctx: &mut Context<'a>) {
    if ctx.path.contains(&id) {
        warn!(block_id = %id, "skipping block that contains itself");
        return;
    }
    let document = ctx.document;
    let Some(block) = document.get(id) else {
        warn!(block_id = %id, "skipping missing block");
        return;
    };

    ctx.path.push(id);
    match block {
        Block::EmailLayout(data) => compile_layout(data, ctx),
        Block::Text(data) => {
            let contents = data
                .props
                .as_ref()
                .and_then(|p| p.rich_text.clone())
                .unwrap_or_default();
            leaf(ctx, "div", text_css(data.style.as_ref()), &contents);
        }
        Block::Heading(data) => compile_heading(data, ctx),
        Block::Button(data) => compile_button(data, ctx),
        Block::Image(data) => compile_image(data, ctx),
        Block::Avatar(data) => {
            let props = data.props.clone().unwrap_or_default();
            let size = props.size.unwrap_or(AVATAR_DEFAULTS.size);
            let radius = match props.shape.unwrap_or(AVATAR_DEFAULTS.shape) {
                AvatarShape::Circle => format!("{}px", size),
                AvatarShape::Rounded => format!("{}px", size * 0.125),
                AvatarShape::Square => "0px".to_string(),
            };

            let mut wrapper = Declarations::new();
            if let Some(style) = &data.style {
                wrapper.push_opt("text-align", style.text_align.map(|a| a.as_css()));
                wrapper.push_padding(style.padding);
            }
            let mut img = Declarations::new();
            img.push("display", "inline-block");
            img.push("object-fit", "cover");
            img.push("width", format!("{}px", size));
            img.push("height", format!("{}px", size));
            img.push("border-radius", radius);
            img.push("outline", "none");
            img.push("border", "none");

            let src = props
                .image_url
                .unwrap_or_else(|| AVATAR_DEFAULTS.image_url.to_string());
            let img_tag = format!(
                "<img src=\"{}\" alt=\"{}\" width=\"{}\" height=\"{}\"{} />",
                attr(&src),
                attr(props.alt.as_deref().unwrap_or("")),
                size,
                size,
                img.style_attr()
            );
            ctx.add_line(&format!("<div{}>{}</div>", wrapper.style_attr(), img_tag));
        }
        Block::Container(data) => {
            let mut css = Declarations::new();
            if let Some(style) = &data.style {
                css.push_opt("background-color", style.background_color.clone());
                css.push_opt(
                    "border",
                    style.border_color.as_ref().map(|c| format!("1px solid {}", c)),
                );
                css.push_px("border-radius", style.border_radius);
                css.push_padding(style.padding);
            }
            ctx.add_line(&format!("<div{}>", css.style_attr()));
            ctx.indent();
            compile_children(block, 0, ctx);
            ctx.dedent();
            ctx.add_line("</div>");
        }
        Block::ColumnsContainer(data) => compile_columns(block, data, ctx),
        Block::Spacer(data) => {
            let height = data
                .props
                .as_ref()
                .and_then(|p| p.height)
                .unwrap_or(SPACER_DEFAULTS.height);
            ctx.add_line(&format!("<div style=\"height: {}px\"></div>", height));
        }
        Block::Divider(data) => {
            let props = data.props.clone().unwrap_or_default();
            let mut wrapper = Declarations::new();
            if let Some(style) = &data.style {
                wrapper.push_opt("background-color", style.background_color.clone());
                wrapper.push_padding(style.padding);
            }
            let mut hr = Declarations::new();
            hr.push("width", "100%");
            hr.push("border", "none");
            hr.push(
                "border-top",
                format!(
                    "{}px solid {}",
                    props.line_height.unwrap_or(DIVIDER_DEFAULTS.line_height),
                    props
                        .line_color
                        .as_deref()
                        .unwrap_or(DIVIDER_DEFAULTS.line_color)
                ),
            );
            hr.push("margin", "0");
            ctx.add_line(&format!(
                "<div{}><hr{} /></div>",
                wrapper.style_attr(),
                hr.style_attr()
            ));
        }
        Block::Html(data) => {
            let contents = data
                .props
                .as_ref()
                .and_then(|p| p.contents.clone())
                .unwrap_or_default();
            leaf(ctx, "div", text_css(data.style.as_ref()), &contents);
        }
    }
    ctx.path.pop();
}

fn compile_children<'a>(block: &'a Block, slot: usize, ctx: &mut Context<'a>) {
    for child in block.children(slot) {
        compile_block(child, ctx);
    }
}

/// Element whose inner HTML is emitted verbatim on one line
fn leaf(ctx: &mut Context, tag: &str, css: Declarations, inner: &str) {
    ctx.add_line(&format!("<{tag}{}>{inner}</{tag}>", css.style_attr()));
}

fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Declarations shared by text-like blocks
fn text_css(style: Option<&BlockStyle>) -> Declarations {
    let mut css = Declarations::new();
    if let Some(style) = style {
        css.push_opt("color", style.color.clone());
        css.push_opt("background-color", style.background_color.clone());
        css.push_px("font-size", style.font_size);
        css.push_opt("font-family", style.font_family.map(|f| f.css_stack()));
        css.push_opt("font-weight", style.font_weight.map(|w| w.as_css()));
        css.push_opt("text-align", style.text_align.map(|a| a.as_css()));
        css.push_padding(style.padding);
    }
    css
}

fn compile_layout<'a>(data: &'a EmailLayoutData, ctx: &mut Context<'a>) {
    let font_family = data.font_family.unwrap_or(LAYOUT_DEFAULTS.font_family);

    let mut backdrop = Declarations::new();
    backdrop.push(
        "background-color",
        data.backdrop_color.as_deref().unwrap_or(LAYOUT_DEFAULTS.backdrop_color),
    );
    backdrop.push(
        "color",
        data.text_color.as_deref().unwrap_or(LAYOUT_DEFAULTS.text_color),
    );
    backdrop.push("font-family", font_family.css_stack());
    backdrop.push("font-size", "16px");
    backdrop.push("font-weight", "400");
    backdrop.push("line-height", "1.5");
    backdrop.push("margin", "0");
    backdrop.push("padding", "32px 0");
    backdrop.push("width", "100%");

    let mut canvas = Declarations::new();
    canvas.push("margin", "0 auto");
    canvas.push("max-width", format!("{}px", ctx.options.max_width));
    canvas.push(
        "background-color",
        data.canvas_color.as_deref().unwrap_or(LAYOUT_DEFAULTS.canvas_color),
    );
    canvas.push_px("border-radius", data.border_radius);
    canvas.push_opt(
        "border",
        data.border_color.as_ref().map(|c| format!("1px solid {}", c)),
    );

    ctx.add_line(&format!("<div{}>", backdrop.style_attr()));
    ctx.indent();
    ctx.add_line(&format!(
        "<table align=\"center\" width=\"100%\" role=\"presentation\" cellspacing=\"0\" cellpadding=\"0\" border=\"0\"{}>",
        canvas.style_attr()
    ));
    ctx.indent();
    ctx.add_line("<tbody>");
    ctx.indent();
    ctx.add_line("<tr style=\"width: 100%\">");
    ctx.indent();
    ctx.add_line("<td>");
    ctx.indent();

    for child in data.children_ids.iter().flatten() {
        compile_block(child, ctx);
    }

    ctx.dedent();
    ctx.add_line("</td>");
    ctx.dedent();
    ctx.add_line("</tr>");
    ctx.dedent();
    ctx.add_line("</tbody>");
    ctx.dedent();
    ctx.add_line("</table>");
    ctx.dedent();
    ctx.add_line("</div>");
}

fn compile_heading(data: &BlockData<HeadingProps>, ctx: &mut Context) {
    let props = data.props.clone().unwrap_or_default();
    let level = props.level.unwrap_or(HEADING_DEFAULTS.level);

    let mut css = Declarations::new();
    let style = data.style.clone().unwrap_or_default();
    css.push_opt("color", style.color);
    css.push_opt("background-color", style.background_color);
    css.push(
        "font-weight",
        style.font_weight.map(|w| w.as_css()).unwrap_or("bold"),
    );
    css.push_opt("text-align", style.text_align.map(|a| a.as_css()));
    css.push("margin", "0");
    css.push_opt("font-family", style.font_family.map(|f| f.css_stack()));
    css.push("font-size", format!("{}px", level.font_size()));
    css.push_padding(style.padding);

    let text = props
        .text
        .filter(|t| !t.is_empty())
        .or(props.rich_text)
        .unwrap_or_default();
    leaf(ctx, level.tag(), css, &text);
}

/// Buttons normally arrive already converted to Html by the reader pass.
/// This path draws them directly when compiling an unconverted document.
fn compile_button(data: &BlockData<ButtonProps>, ctx: &mut Context) {
    ctx.add_line(&crate::reader::button_html(data));
}

fn compile_image(data: &BlockData<ImageProps>, ctx: &mut Context) {
    let props = data.props.clone().unwrap_or_default();

    let mut wrapper = Declarations::new();
    if let Some(style) = &data.style {
        wrapper.push_opt("background-color", style.background_color.clone());
        wrapper.push_opt("text-align", style.text_align.map(|a| a.as_css()));
        wrapper.push_padding(style.padding);
    }

    let mut img = Declarations::new();
    img.push("outline", "none");
    img.push("border", "none");
    img.push("text-decoration", "none");
    img.push(
        "vertical-align",
        props
            .content_alignment
            .unwrap_or(IMAGE_DEFAULTS.content_alignment)
            .as_css(),
    );
    img.push("display", "inline-block");
    img.push("max-width", "100%");

    let src = props.url.unwrap_or_else(|| IMAGE_DEFAULTS.url.to_string());
    let alt = props.alt.unwrap_or_default();
    let mut img_tag = format!("<img src=\"{}\" alt=\"{}\"", attr(&src), attr(&alt));
    if let Some(width) = props.width {
        img_tag.push_str(&format!(" width=\"{}\"", width));
    }
    if let Some(height) = props.height {
        img_tag.push_str(&format!(" height=\"{}\"", height));
    }
    img_tag.push_str(&img.style_attr());
    img_tag.push_str(" />");

    let inner = match props.link_href {
        Some(href) => format!(
            "<a href=\"{}\" style=\"text-decoration: none\" target=\"_blank\">{}</a>",
            attr(&href),
            img_tag
        ),
        None => img_tag,
    };
    ctx.add_line(&format!("<div{}>{}</div>", wrapper.style_attr(), inner));
}

fn compile_columns<'a>(
    block: &'a Block,
    data: &'a BlockData<ColumnsContainerProps>,
    ctx: &mut Context<'a>,
) {
    let props = data.props.clone().unwrap_or_default();
    let count = match props.columns_count.unwrap_or(COLUMNS_DEFAULTS.columns_count) {
        3 => 3,
        _ => 2,
    };
    let gap = props.columns_gap.unwrap_or(COLUMNS_DEFAULTS.columns_gap);
    let alignment = props
        .content_alignment
        .unwrap_or(COLUMNS_DEFAULTS.content_alignment);
    let widths = props.fixed_widths.unwrap_or_default();

    let mut wrapper = Declarations::new();
    if let Some(style) = &data.style {
        wrapper.push_opt("background-color", style.background_color.clone());
        wrapper.push_padding(style.padding);
    }

    ctx.add_line(&format!("<div{}>", wrapper.style_attr()));
    ctx.indent();
    ctx.add_line("<table align=\"center\" width=\"100%\" cellpadding=\"0\" border=\"0\" style=\"table-layout: fixed; border-collapse: collapse\">");
    ctx.indent();
    ctx.add_line("<tbody style=\"width: 100%\">");
    ctx.indent();
    ctx.add_line("<tr style=\"width: 100%\">");
    ctx.indent();

    for slot in 0..count {
        let mut cell = Declarations::new();
        cell.push("box-sizing", "content-box");
        cell.push("vertical-align", alignment.as_css());
        cell.push("padding-left", format!("{}px", if slot == 0 { 0.0 } else { gap / 2.0 }));
        cell.push(
            "padding-right",
            format!("{}px", if slot + 1 == count { 0.0 } else { gap / 2.0 }),
        );
        cell.push_px("width", widths.get(slot).copied().flatten());

        ctx.add_line(&format!("<td{}>", cell.style_attr()));
        ctx.indent();
        compile_children(block, slot, ctx);
        ctx.dedent();
        ctx.add_line("</td>");
    }

    ctx.dedent();
    ctx.add_line("</tr>");
    ctx.dedent();
    ctx.add_line("</tbody>");
    ctx.dedent();
    ctx.add_line("</table>");
    ctx.dedent();
    ctx.add_line("</div>");
}
