//! Integration tests for the editor session

use mailframe_editor::{
    BlockIdGenerator, ChangeEvent, EditorError, EditorHost, EditorOptions, EmailEditor, FileUpload,
    InsertTarget, MainTab, Mutation, PlaceholderReason, RenderNode, UploadError,
};
use mailframe_compiler_html::ReaderMode;
use mailframe_schema::{Block, BlockType, Document, ROOT_BLOCK_ID};
use std::time::{Duration, Instant};

#[derive(Default)]
struct MockHost {
    changes: Vec<(String, usize)>,
    snapshots: usize,
    uploads: Vec<String>,
    reject_uploads: bool,
}

impl EditorHost for MockHost {
    fn on_change(&mut self, event: &ChangeEvent<'_>) {
        self.changes.push((event.html.clone(), event.design.len()));
    }

    fn on_file_upload(&mut self, file: &FileUpload) -> Result<String, UploadError> {
        if self.reject_uploads {
            return Err(UploadError::Rejected("quota exceeded".into()));
        }
        self.uploads.push(file.file_name.clone());
        Ok(format!("https://cdn.example.com/{}", file.file_name))
    }

    fn on_snapshot(&mut self, _design: &Document) {
        self.snapshots += 1;
    }
}

fn editor() -> EmailEditor<MockHost> {
    editor_with(MockHost::default())
}

fn editor_with(host: MockHost) -> EmailEditor<MockHost> {
    let options = EditorOptions {
        ids: BlockIdGenerator::sequential("block"),
        ..EditorOptions::default()
    };
    EmailEditor::new(Document::default(), host, options)
}

fn insert(editor: &mut EmailEditor<MockHost>, block_type: BlockType) -> String {
    editor
        .apply(&Mutation::InsertBlock {
            target: InsertTarget::append(ROOT_BLOCK_ID),
            block: Block::starter(block_type),
        })
        .unwrap()
        .block_id
}

fn upload(name: &str) -> FileUpload {
    FileUpload {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

#[test]
fn test_every_document_change_reaches_host() {
    let mut editor = editor();
    let button = insert(&mut editor, BlockType::Button);
    assert_eq!(button, "block-1");

    let host = editor.host();
    assert_eq!(host.changes.len(), 2);
    assert_eq!(host.snapshots, 2);

    let (html, blocks) = &host.changes[1];
    assert_eq!(*blocks, 2);
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Click me"));
}

#[test]
fn test_panel_edits_publish_html() {
    let mut editor = editor();
    let text = insert(&mut editor, BlockType::Text);

    let mut panel = editor.panel().unwrap();
    assert_eq!(panel.block_id(), text);
    panel.set_text_color(editor.store_mut(), "#ff0000").unwrap();

    let host = editor.host();
    let (html, _) = host.changes.last().unwrap();
    assert!(html.contains("color: #ff0000"));
}

#[test]
fn test_rejected_panel_edit_publishes_nothing() {
    let mut editor = editor();
    insert(&mut editor, BlockType::Heading);
    let published = editor.host().changes.len();

    let mut panel = editor.panel().unwrap();
    let patch = serde_json::json!({"level": "h9"});
    let err = panel
        .patch_props(editor.store_mut(), patch.as_object().unwrap().clone())
        .unwrap_err();

    assert!(matches!(err, EditorError::Schema(_)));
    assert!(panel.last_error().unwrap().has_path("props.level"));
    assert_eq!(editor.host().changes.len(), published);
}

#[test]
fn test_debounced_content_commits_last_value() {
    let mut editor = editor();
    let text = insert(&mut editor, BlockType::Text);
    let published = editor.host().changes.len();

    let start = Instant::now();
    editor.edit_content(&text, "<p>H</p>", start).unwrap();
    editor
        .edit_content(&text, "<p>Hello</p>", start + Duration::from_millis(200))
        .unwrap();

    assert!(editor.tick(start + Duration::from_millis(400)).is_empty());
    assert_eq!(editor.tick(start + Duration::from_millis(500)), vec![text.clone()]);

    let data = editor.document().get(&text).unwrap().data_value();
    assert_eq!(data["props"]["richText"], "<p>Hello</p>");
    assert_eq!(editor.host().changes.len(), published + 1);
}

#[test]
fn test_upload_sets_image_url() {
    let mut editor = editor();
    let image = insert(&mut editor, BlockType::Image);
    let avatar = insert(&mut editor, BlockType::Avatar);

    let url = editor.upload_image(&image, &upload("hero.png")).unwrap();
    assert_eq!(url, "https://cdn.example.com/hero.png");
    let data = editor.document().get(&image).unwrap().data_value();
    assert_eq!(data["props"]["url"], url);

    editor.upload_image(&avatar, &upload("me.png")).unwrap();
    let data = editor.document().get(&avatar).unwrap().data_value();
    assert_eq!(data["props"]["imageUrl"], "https://cdn.example.com/me.png");

    assert_eq!(editor.host().uploads, vec!["hero.png", "me.png"]);
}

#[test]
fn test_upload_errors() {
    let mut editor = editor_with(MockHost {
        reject_uploads: true,
        ..MockHost::default()
    });
    let image = insert(&mut editor, BlockType::Image);
    let text = insert(&mut editor, BlockType::Text);
    let version = editor.store().version();

    assert!(matches!(
        editor.upload_image(&image, &upload("a.png")),
        Err(EditorError::Upload(UploadError::Rejected(_)))
    ));
    assert!(matches!(
        editor.upload_image(&text, &upload("a.png")),
        Err(EditorError::Unsupported { .. })
    ));
    assert_eq!(editor.store().version(), version);
}

#[test]
fn test_dangling_reference_degrades_to_placeholder() {
    let mut editor = editor();
    let text = insert(&mut editor, BlockType::Text);

    // Bypass the mutation helpers and point root at an id that does not exist
    let root = editor
        .document()
        .root()
        .cloned()
        .unwrap()
        .with_children(0, vec!["ghost".to_string(), text.clone()]);
    editor.store_mut().set_document([(ROOT_BLOCK_ID.to_string(), root)]);

    let tree = editor.render();
    assert_eq!(tree.placeholder_count(), 1);
    assert!(matches!(
        tree.children()[0],
        RenderNode::Placeholder {
            reason: PlaceholderReason::Missing,
            ..
        }
    ));

    // The host still gets HTML for the blocks that do exist
    let (html, _) = editor.host().changes.last().cloned().unwrap();
    assert!(html.contains("Click to edit text"));
}

#[test]
fn test_preview_html_and_view_state() {
    let mut editor = editor();
    let heading = insert(&mut editor, BlockType::Heading);
    let mut panel = editor.panel().unwrap();
    panel
        .set_heading_level(editor.store_mut(), mailframe_schema::HeadingLevel::H6)
        .unwrap();

    let export = editor.html(ReaderMode::Export).unwrap();
    let preview = editor.html(ReaderMode::Preview).unwrap();
    assert!(export.contains("<h3"));
    assert!(preview.contains("<h6>"));
    assert_eq!(editor.document().get(&heading).unwrap().data_value()["props"]["level"], "h6");

    let published = editor.host().changes.len();
    editor.store_mut().set_selected_main_tab(MainTab::Preview);
    assert_eq!(editor.store().view().selected_main_tab, MainTab::Preview);
    assert_eq!(editor.host().changes.len(), published);
}
