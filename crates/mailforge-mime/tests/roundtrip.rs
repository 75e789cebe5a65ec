//! Integration tests for message assembly.

use mailforge_mime::encoding::{decode_quoted_printable, encode_quoted_printable};
use mailforge_mime::{Attachment, ContentType, Headers, InlinePart, MessageBuilder};
use proptest::prelude::*;

#[test]
fn test_full_structure_serializes_and_reparses_headers() {
    let message = MessageBuilder::new()
        .from("news@example.com")
        .to("a@example.com")
        .to("b@example.com")
        .cc("c@example.com")
        .subject("Weekly digest")
        .text_body("Hello\nWorld")
        .html_body("<h1>Hello</h1>")
        .inline(InlinePart::new(
            "banner.png",
            ContentType::from_extension("image", "png"),
            vec![0x89, b'P', b'N', b'G'],
        ))
        .attach(Attachment::new(
            "notes.txt",
            ContentType::from_extension("text", "txt"),
            b"notes".to_vec(),
        ))
        .seed(42)
        .build()
        .unwrap();

    let wire = message.to_string();
    let (head, _) = wire.split_once("\r\n\r\n").unwrap();
    let headers = Headers::parse(head).unwrap();

    assert_eq!(headers.get("to"), Some("a@example.com, b@example.com"));
    assert_eq!(headers.get("cc"), Some("c@example.com"));
    assert_eq!(headers.get("mime-version"), Some("1.0"));
    assert!(headers.get("content-type").unwrap().starts_with("multipart/mixed"));

    assert_eq!(message.text_body().as_deref(), Some("Hello\r\nWorld"));
    assert_eq!(message.html_body().as_deref(), Some("<h1>Hello</h1>"));
    assert!(message.find_content_id("banner.png").is_some());
    assert!(wire.lines().all(|line| line.len() <= 78));
}

proptest! {
    #[test]
    fn quoted_printable_lines_stay_short(text in "[ -~é\n]{0,300}") {
        let encoded = encode_quoted_printable(&text);
        for line in encoded.split("\r\n") {
            prop_assert!(line.len() <= 76);
        }
        let decoded = decode_quoted_printable(&encoded).unwrap();
        prop_assert_eq!(decoded, text.replace("\r\n", "\n").replace('\n', "\r\n"));
    }
}
