//! Integration tests for document rendering and message assembly.

use mailforge::{
    Container, ContentIdPolicy, Document, DraftOutcome, EmlDraftExporter, Error, Image, Leaf,
    OrderedList, RenderOptions, Styled, StyleTable, Table, UnorderedList, Unsupported,
};

fn cid_references(html: &str) -> Vec<&str> {
    html.match_indices("src=\"cid:")
        .map(|(start, marker)| {
            let rest = &html[start + marker.len()..];
            &rest[..rest.find('"').unwrap()]
        })
        .collect()
}

fn sample_document() -> Document {
    let mut email = Document::new("Digest", "news@example.com").to("reader@example.com");
    email.append(Leaf::header("Digest"));
    email.append(
        Container::new()
            .style("color", "#444444")
            .child(Leaf::paragraph("Top *stories*"))
            .child(UnorderedList::new().child("one").child("two")),
    );
    email.append("Thanks for reading");
    email
}

#[test]
fn test_rendering_is_idempotent() {
    let mut email = sample_document();
    let first = email.html().unwrap();
    let second = email.html().unwrap();
    assert_eq!(first, second);

    let rendered = email.render().unwrap();
    assert_eq!(rendered.html, first);
    assert_eq!(email.plain(), email.plain());
}

#[test]
fn test_same_tree_under_two_documents() {
    let section = Container::new().child(Leaf::paragraph("shared"));
    let mut plain = Document::new("a", "a@example.com");
    plain.append(section.clone());
    let mut styled = Document::new("b", "b@example.com")
        .with_style(&StyleTable::new().with_rule("paragraph", [("margin-bottom", "0")]));
    styled.append(section);

    let a = plain.html().unwrap();
    let b = styled.html().unwrap();
    assert!(a.contains("margin-bottom: 12px"));
    assert!(b.contains("margin-bottom: 0"));
}

#[test]
fn test_identical_images_share_one_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.png");
    std::fs::write(&path, b"\x89PNG logo").unwrap();

    let mut email = Document::new("s", "a@example.com");
    email.append(Image::from_file(&path).alt("Logo"));
    email.append(Image::from_file(&path).alt("Logo again"));

    let html = email.html().unwrap();
    assert_eq!(email.attachments().len(), 1);
    let registered = &email.attachments().entries()[0].content_id;
    assert_eq!(cid_references(&html), vec![registered.as_str(), registered.as_str()]);
}

#[test]
fn test_copied_bytes_follow_canonical_id() {
    let mut email = Document::new("s", "a@example.com");
    email.append(Image::from_bytes(b"pixels".to_vec(), "png").content_id("hero"));
    email.append(Image::from_bytes(b"pixels".to_vec(), "png").content_id("footer"));

    let html = email.html().unwrap();
    assert_eq!(cid_references(&html), vec!["hero", "hero"]);
    assert_eq!(email.attachments().len(), 1);
}

#[test]
fn test_distinct_policy_keeps_requested_ids() {
    let mut email = Document::new("s", "a@example.com").with_options(RenderOptions {
        content_id_policy: ContentIdPolicy::Distinct,
        ..RenderOptions::default()
    });
    email.append(Image::from_bytes(b"pixels".to_vec(), "png").content_id("hero"));
    email.append(Image::from_bytes(b"pixels".to_vec(), "png").content_id("footer"));

    let html = email.html().unwrap();
    assert_eq!(cid_references(&html), vec!["hero", "footer"]);
    let ids: Vec<_> = email
        .attachments()
        .entries()
        .iter()
        .map(|entry| entry.content_id.as_str())
        .collect();
    assert_eq!(ids, ["hero", "footer"]);
}

#[test]
fn test_ordered_list_numbering() {
    let mut email = Document::new("s", "a@example.com");
    email.append(OrderedList::new().child("a").child("b").child("c"));
    email.append(
        OrderedList::new()
            .child("first")
            .child(OrderedList::new().child("x").child("y")),
    );

    assert_eq!(
        email.plain(),
        "  1. a\n  2. b\n  3. c\n  1. first\n    2.1. x\n    2.2. y\n"
    );
}

#[test]
fn test_tab_size_option() {
    let mut email = Document::new("s", "a@example.com").with_options(RenderOptions {
        tab_size: 4,
        ..RenderOptions::default()
    });
    email.append(UnorderedList::new().child("item"));
    assert_eq!(email.plain(), "    * item\n");
}

#[test]
fn test_container_typography_reaches_leaf() {
    let mut email = Document::new("s", "a@example.com");
    email.append(
        Container::new()
            .style("color", "#123456")
            .style("font-size", "18px")
            .child(Leaf::paragraph("styled")),
    );

    let html = email.html().unwrap();
    let paragraph = &html[html.find("<p ").unwrap()..];
    let style_end = paragraph.find('>').unwrap();
    let style = &paragraph[..style_end];
    assert!(style.contains("color: #123456 !important;"));
    assert!(style.contains("font-size: 18px !important;"));
    assert!(style.contains("margin-bottom: 12px !important;"));
}

#[test]
fn test_table_mode_nests_container_in_table() {
    let mut email = Document::new("s", "a@example.com").with_options(RenderOptions {
        table_mode: true,
        ..RenderOptions::default()
    });
    email.append(Container::new().child(Container::new().child("inner")));

    let html = email.html().unwrap();
    assert!(!html.contains("<div"));
    let row = html.find("<tr><td").unwrap();
    let nested = html
        .find("<table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr><td")
        .unwrap();
    assert!(row < nested);
    assert!(html.ends_with("inner<br/></td></tr></table></td></tr></table>"));
}

#[test]
fn test_table_mode_lists_never_hold_bare_rows() {
    let mut email = Document::new("s", "a@example.com").with_options(RenderOptions {
        table_mode: true,
        ..RenderOptions::default()
    });
    email.append(
        OrderedList::new()
            .child("plain item")
            .child(Container::new().child("boxed"))
            .child(Table::new().child("cell")),
    );
    email.append(UnorderedList::new().child(Container::new().child(Container::new().child("deep"))));

    let html = email.html().unwrap();
    assert!(!html.contains("<li><tr"));
    assert!(html.contains("<li>plain item</li>"));
    assert_eq!(html.matches("<li><table").count(), 3);
    assert!(html.contains("boxed<br/></td></tr></table></li>"));
    assert!(html.contains("cell<br/></td></tr></table></li>"));
    assert!(html.contains("deep<br/></td></tr></table></td></tr></table></li>"));

    assert_eq!(
        email.plain(),
        "  1. plain item\n  2. boxed\n  3. cell\n  * deep\n"
    );
}

#[test]
fn test_file_attachments_get_registered_media_types() {
    let mut email = Document::new("s", "a@example.com");
    email.attach(b"PK", "application", "docx", Some("letter"));
    email.attach(b"ID3", "audio", "mp3", Some("voice"));
    email.attach(b"??", "application", "unknown-ext", Some("blob"));

    let types: Vec<_> = email
        .files()
        .iter()
        .map(|file| file.content_type.essence())
        .collect();
    assert_eq!(
        types,
        [
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "audio/mpeg",
            "application/octet-stream",
        ]
    );
}

#[test]
fn test_missing_image_aborts_render() {
    let mut email = Document::new("s", "a@example.com");
    email.append(Leaf::paragraph("before"));
    email.append(Image::from_file("/definitely/missing/banner.png"));

    match email.html() {
        Err(Error::Io { path, .. }) => assert!(path.ends_with("banner.png")),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_message_structure() {
    let mut email = sample_document().cc("copy@example.com").bcc("hidden@example.com");
    email.append(Image::from_bytes(b"GIF89a".to_vec(), "gif").content_id("pixel"));
    email.attach(b"col1,col2\n", "text", "csv", Some("report"));

    let message = email.message().unwrap();
    let wire = String::from_utf8(message.to_bytes()).unwrap();
    let head = wire.split("\r\n\r\n").next().unwrap();

    assert!(head.contains("Subject: Digest"));
    assert!(head.contains("Cc: copy@example.com"));
    assert!(!head.lines().any(|line| line.to_ascii_lowercase().starts_with("bcc:")));
    assert!(!head.contains("hidden@example.com"));
    assert!(message.envelope_recipients().iter().any(|r| r == "hidden@example.com"));

    assert!(
        message
            .root()
            .walk()
            .any(|part| part.content_type().is_ok_and(|ct| ct.essence() == "multipart/related"))
    );
    assert!(message.find_part("text/csv").is_some());
    let pixel = message.find_content_id("pixel").unwrap();
    assert_eq!(pixel.decode_body().unwrap(), b"GIF89a");

    let html = message.html_body().unwrap();
    assert!(html.contains("cid:pixel"));
    assert!(message.text_body().unwrap().contains("Thanks for reading"));
}

#[test]
fn test_export_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let mut email = sample_document();

    let outcome = email.export(&Unsupported).unwrap();
    assert!(matches!(outcome, DraftOutcome::Unavailable(_)));

    let outcome = email.export(&EmlDraftExporter::new(dir.path())).unwrap();
    match outcome {
        DraftOutcome::Created(handle) => {
            assert_eq!(handle.path, dir.path().join("digest.eml"));
            assert!(handle.path.exists());
        }
        DraftOutcome::Unavailable(reason) => panic!("unexpected: {reason}"),
    }
}
