//! Inline text markup and small HTML helpers.
//!
//! [`parse_text`] turns `**bold**`, `*italic*`, `_underline_` and `-strike-`
//! into `<b>`, `<i>`, `<u>` and `<s>`. A delimiter run only counts when:
//!
//! - the character before the opening run is neither a word character nor
//!   the delimiter itself,
//! - the character after the closing run is neither a word character nor the
//!   delimiter itself,
//! - the enclosed text is non-empty, stays on one line, and neither starts
//!   nor ends with whitespace nor starts with the delimiter.
//!
//! The shortest valid span wins, and passes run in the order bold, italic,
//! underline, strikethrough.

use std::fmt::Write as _;

use html_escape::encode_double_quoted_attribute;
use indexmap::IndexMap;

use crate::style::Declarations;

const PASSES: [(&str, &str); 4] = [("**", "b"), ("*", "i"), ("_", "u"), ("-", "s")];

/// Converts inline markup delimiters to HTML tags.
#[must_use]
pub fn parse_text(text: &str) -> String {
    PASSES
        .iter()
        .fold(text.to_string(), |acc, (delimiter, tag)| replace_spans(&acc, delimiter, tag))
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn replace_spans(text: &str, delimiter: &str, tag: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let delim: Vec<char> = delimiter.chars().collect();
    let width = delim.len();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if let Some(end) = match_span(&chars, i, &delim) {
            let inner: String = chars[i + width..end].iter().collect();
            let _ = write!(out, "<{tag}>{inner}</{tag}>");
            i = end + width;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

/// Returns the index of the closing delimiter run for a span opening at
/// `start`, if one is valid.
fn match_span(chars: &[char], start: usize, delim: &[char]) -> Option<usize> {
    let marker = delim[0];
    let width = delim.len();

    if !chars[start..].starts_with(delim) {
        return None;
    }
    if start > 0 && (is_word(chars[start - 1]) || chars[start - 1] == marker) {
        return None;
    }

    let first = *chars.get(start + width)?;
    if first == marker || first.is_whitespace() {
        return None;
    }

    let mut end = start + width + 1;
    while end + width <= chars.len() {
        let previous = chars[end - 1];
        if previous == '\n' {
            return None;
        }
        if chars[end..].starts_with(delim) && !previous.is_whitespace() {
            let after = chars.get(end + width).copied();
            if after.is_none_or(|c| !is_word(c) && c != marker) {
                return Some(end);
            }
        }
        end += 1;
    }

    None
}

/// Writes an opening tag with an inline style and extra attributes.
///
/// An empty style block omits the `style` attribute.
#[must_use]
pub fn open_tag(name: &str, style: &Declarations, properties: &IndexMap<String, String>) -> String {
    let mut tag = format!("<{name}");
    if !style.is_empty() {
        let _ = write!(tag, " style=\"{style}\"");
    }
    for (attribute, value) in properties {
        let _ = write!(tag, " {attribute}=\"{}\"", encode_double_quoted_attribute(value));
    }
    tag.push('>');
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_delimiters() {
        assert_eq!(
            parse_text("**bold** and *italic* and _under_ and -strike-"),
            "<b>bold</b> and <i>italic</i> and <u>under</u> and <s>strike</s>"
        );
    }

    #[test]
    fn test_whitespace_inside_delimiters_is_literal() {
        assert_eq!(parse_text("** not bold **"), "** not bold **");
        assert_eq!(parse_text("a * b * c"), "a * b * c");
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(parse_text("snake_case_name"), "snake_case_name");
        assert_eq!(parse_text("e-mail and re-send"), "e-mail and re-send");
        assert_eq!(parse_text("2*3*4"), "2*3*4");
    }

    #[test]
    fn test_triple_delimiters_are_literal() {
        assert_eq!(parse_text("***x***"), "***x***");
        assert_eq!(parse_text("--x--"), "--x--");
    }

    #[test]
    fn test_shortest_span_and_multiple_spans() {
        assert_eq!(parse_text("*a* *b*"), "<i>a</i> <i>b</i>");
        assert_eq!(parse_text("(**x**)"), "(<b>x</b>)");
    }

    #[test]
    fn test_closing_run_skips_invalid_candidates() {
        assert_eq!(parse_text("*a*b c*"), "<i>a*b c</i>");
    }

    #[test]
    fn test_spans_do_not_cross_lines() {
        assert_eq!(parse_text("*a\nb*"), "*a\nb*");
    }

    #[test]
    fn test_open_tag() {
        let style = Declarations::from([("color", "red")]);
        let mut properties = IndexMap::new();
        properties.insert("width".to_string(), "600".to_string());
        assert_eq!(
            open_tag("div", &style, &properties),
            "<div style=\"color: red !important;\" width=\"600\">"
        );
        assert_eq!(open_tag("p", &Declarations::new(), &IndexMap::new()), "<p>");
    }

    #[test]
    fn test_open_tag_escapes_attribute_values() {
        let mut properties = IndexMap::new();
        properties.insert("title".to_string(), "Tom & \"Jerry\" <3".to_string());
        let style = Declarations::new().with("font-family", "\"Open Sans\"");
        assert_eq!(
            open_tag("td", &style, &properties),
            "<td style=\"font-family: &quot;Open Sans&quot; !important;\" \
             title=\"Tom &amp; &quot;Jerry&quot; &lt;3\">"
        );
    }
}
