use crate::{button_html, compile_to_html, prepare_for_reader, CompileError, CompileOptions, ReaderMode};
use mailframe_schema::{Block, BlockData, ButtonProps, Document, Padding, BlockStyle};
use serde_json::json;

fn document(value: serde_json::Value) -> Document {
    Document::from_json_value(value).expect("Failed to decode document")
}

fn sample() -> Document {
    document(json!({
        "root": {
            "type": "EmailLayout",
            "data": {
                "backdropColor": "#F8F8F8",
                "canvasColor": "#FFFFFF",
                "childrenIds": ["title", "body", "cta"]
            }
        },
        "title": {
            "type": "Heading",
            "data": {"props": {"text": "Welcome", "level": "h5"}}
        },
        "body": {
            "type": "Text",
            "data": {"props": {"richText": "<p>Hello there</p>"}}
        },
        "cta": {
            "type": "Button",
            "data": {"props": {"text": "Go", "url": "https://example.com/?a=1&b=\"2\""}}
        }
    }))
}

#[test]
fn test_compile_full_document() {
    let html = compile_to_html(&sample(), "root", &CompileOptions::default())
        .expect("Failed to compile");

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<meta charset=\"UTF-8\">"));
    assert!(html.contains("background-color: #F8F8F8"));
    assert!(html.contains("max-width: 600px"));
    assert!(html.contains("<h5"));
    assert!(html.contains(">Welcome</h5>"));
    assert!(html.contains("<p>Hello there</p>"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn test_children_emitted_in_order() {
    let html = compile_to_html(&sample(), "root", &CompileOptions::default()).unwrap();
    let title = html.find("Welcome").unwrap();
    let body = html.find("Hello there").unwrap();
    let cta = html.find(">Go<").unwrap();
    assert!(title < body && body < cta);
}

#[test]
fn test_missing_root() {
    let err = compile_to_html(&sample(), "nope", &CompileOptions::default()).unwrap_err();
    assert_eq!(err, CompileError::MissingRoot("nope".to_string()));
}

#[test]
fn test_fragment_without_wrapper() {
    let options = CompileOptions {
        full_document: false,
        ..CompileOptions::default()
    };
    let html = compile_to_html(&sample(), "body", &options).unwrap();
    assert_eq!(html, "<div><p>Hello there</p></div>\n");
}

#[test]
fn test_compact_output_has_no_newlines() {
    let options = CompileOptions {
        pretty: false,
        ..CompileOptions::default()
    };
    let html = compile_to_html(&sample(), "root", &options).unwrap();
    assert!(!html.contains('\n'));
}

#[test]
fn test_missing_and_cyclic_children_are_skipped() {
    let doc = document(json!({
        "root": {"type": "EmailLayout", "data": {"childrenIds": ["ghost", "box"]}},
        "box": {"type": "Container", "data": {"props": {"childrenIds": ["box", "leaf"]}}},
        "leaf": {"type": "Spacer", "data": {"props": {"height": 40}}}
    }));

    let html = compile_to_html(&doc, "root", &CompileOptions::default()).unwrap();
    assert_eq!(html.matches("height: 40px").count(), 1);
}

#[test]
fn test_columns_emit_one_cell_per_column() {
    let doc = document(json!({
        "root": {"type": "EmailLayout", "data": {"childrenIds": ["cols"]}},
        "cols": {
            "type": "ColumnsContainer",
            "data": {
                "props": {
                    "columnsCount": 3,
                    "columnsGap": 16,
                    "columns": [
                        {"childrenIds": ["a"]},
                        {"childrenIds": []},
                        {"childrenIds": ["b"]}
                    ]
                }
            }
        },
        "a": {"type": "Html", "data": {"props": {"contents": "first"}}},
        "b": {"type": "Html", "data": {"props": {"contents": "third"}}}
    }));

    let html = compile_to_html(&doc, "root", &CompileOptions::default()).unwrap();
    assert_eq!(html.matches("<td style=\"box-sizing").count(), 3);
    assert!(html.contains("padding-left: 0px; padding-right: 8px"));
    assert!(html.contains("padding-left: 8px; padding-right: 0px"));
    assert!(html.find("first").unwrap() < html.find("third").unwrap());
}

#[test]
fn test_two_column_default_ignores_third_cell() {
    let doc = document(json!({
        "root": {"type": "EmailLayout", "data": {"childrenIds": ["cols"]}},
        "cols": {
            "type": "ColumnsContainer",
            "data": {
                "props": {
                    "columns": [
                        {"childrenIds": []},
                        {"childrenIds": []},
                        {"childrenIds": ["hidden"]}
                    ]
                }
            }
        },
        "hidden": {"type": "Html", "data": {"props": {"contents": "hidden"}}}
    }));

    let html = compile_to_html(&doc, "root", &CompileOptions::default()).unwrap();
    assert_eq!(html.matches("<td style=\"box-sizing").count(), 2);
    assert!(!html.contains(">hidden<"));
}

#[test]
fn test_image_attributes_are_escaped() {
    let doc = document(json!({
        "root": {"type": "EmailLayout", "data": {"childrenIds": ["img"]}},
        "img": {
            "type": "Image",
            "data": {"props": {"url": "https://x.test/a.png?q=\"1\"", "alt": "<logo>", "linkHref": "https://x.test"}}
        }
    }));

    let html = compile_to_html(&doc, "root", &CompileOptions::default()).unwrap();
    assert!(html.contains("src=\"https://x.test/a.png?q=&quot;1&quot;\""));
    assert!(html.contains("alt=\"&lt;logo&gt;\""));
    assert!(html.contains("<a href=\"https://x.test\""));
}

#[test]
fn test_export_reader_collapses_deep_headings_and_converts_buttons() {
    let ready = prepare_for_reader(&sample(), ReaderMode::Export);

    assert_eq!(ready.ids().collect::<Vec<_>>(), sample().ids().collect::<Vec<_>>());
    let title = ready.get("title").unwrap().data_value();
    assert_eq!(title["props"]["level"], "h3");
    assert!(matches!(ready.get("body"), Some(Block::Text(_))));

    let Some(Block::Html(cta)) = ready.get("cta") else {
        panic!("button should become html");
    };
    let contents = cta.props.as_ref().unwrap().contents.clone().unwrap();
    assert!(contents.contains("href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\""));
    assert!(contents.contains(">Go</div>"));
}

#[test]
fn test_preview_reader_turns_text_into_html() {
    let ready = prepare_for_reader(&sample(), ReaderMode::Preview);

    let Some(Block::Html(title)) = ready.get("title") else {
        panic!("heading should become html");
    };
    assert_eq!(
        title.props.as_ref().unwrap().contents.as_deref(),
        Some("<h5>Welcome</h5>")
    );
    let Some(Block::Html(body)) = ready.get("body") else {
        panic!("text should become html");
    };
    assert_eq!(
        body.props.as_ref().unwrap().contents.as_deref(),
        Some("<p>Hello there</p>")
    );
}

#[test]
fn test_button_margin_falls_back_per_side() {
    let data = BlockData::new(
        Some(BlockStyle {
            padding: Some(Padding::new(10.0, 0.0, 0.0, 20.0)),
            ..BlockStyle::default()
        }),
        Some(ButtonProps::default()),
    );
    let html = button_html(&data);
    assert!(html.contains("margin: 10px 8px 4px 20px"));
    assert!(html.contains("text-align: left"));
    assert!(html.contains("font-family: Arial, sans-serif"));
}

#[test]
fn test_bordered_button_is_transparent() {
    let data = BlockData::new(
        Some(BlockStyle {
            border_color: Some("#123456".into()),
            ..BlockStyle::default()
        }),
        Some(ButtonProps {
            variant: Some(mailframe_schema::ButtonVariant::Bordered),
            ..ButtonProps::default()
        }),
    );
    let html = button_html(&data);
    assert!(html.contains("background-color: transparent"));
    assert!(html.contains("border: 2px solid #123456"));
}
