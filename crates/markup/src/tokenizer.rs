//! Forgiving markup tokenizer that streams events into a [`TokenSink`].
//!
//! This is the event source for both builders. It is deliberately not a full
//! HTML5 state machine: article bodies come from a rendering service and are
//! well-formed enough that a linear scan gets the structure right.
//!
//! Known limitations:
//! - Tag/attribute names are restricted to ASCII `[A-Za-z0-9:_-]` and lowercased.
//! - Rawtext close-tag scanning accepts only ASCII whitespace before `>`.
//! - `<` not followed by a name character, `/`, or `!` is kept as text.
use crate::entities::decode_entities;
use crate::types::{Attribute, Token, TokenSink, VecTokenSink};
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

// Only ever matched starting at an ASCII `<`, which cannot be a UTF-8
// continuation byte.
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

/// Find `close_tag` followed by optional ASCII whitespace and `>`; returns
/// the (start, end) byte range of the whole close tag.
fn find_rawtext_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let n = close_tag.len();
    let mut i = 0;
    while i + n <= bytes.len() {
        i += memchr(b'<', &bytes[i..])?;
        if starts_with_ignore_ascii_case_at(bytes, i, close_tag) {
            let mut k = i + n;
            while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < bytes.len() && bytes[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Collect all events into a token list.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    tokenize_into(input, &mut VecTokenSink(&mut out));
    out
}

/// Stream events for `input` into `sink`.
///
/// Explicit self-closing syntax (`<p/>`) produces a start event followed by
/// an end event; void elements produce only the start event.
pub fn tokenize_into<S: TokenSink + ?Sized>(input: &str, sink: &mut S) {
    Scanner {
        input,
        bytes: input.as_bytes(),
        pos: 0,
    }
    .run(sink);
}

/// Invariant: we scan by byte, but every slice endpoint is either an ASCII
/// structural byte or the end of an ASCII-only run, so it is a char boundary.
struct Scanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn run<S: TokenSink + ?Sized>(mut self, sink: &mut S) {
        let mut text_start = 0;
        while self.pos < self.bytes.len() {
            let Some(rel) = memchr(b'<', &self.bytes[self.pos..]) else {
                self.pos = self.bytes.len();
                break;
            };
            let lt = self.pos + rel;
            if !self.is_markup_start(lt) {
                // Stray `<`: keep it inside the surrounding text run.
                self.pos = lt + 1;
                continue;
            }
            self.flush_text(text_start, lt, sink);
            self.pos = lt;
            if !self.markup(sink) {
                text_start = self.bytes.len();
                break;
            }
            text_start = self.pos;
        }
        self.flush_text(text_start, self.bytes.len(), sink);
    }

    fn is_markup_start(&self, lt: usize) -> bool {
        match self.bytes.get(lt + 1) {
            Some(b'/') | Some(b'!') => true,
            Some(&b) => b.is_ascii_alphabetic(),
            None => false,
        }
    }

    fn flush_text<S: TokenSink + ?Sized>(&self, start: usize, end: usize, sink: &mut S) {
        if start >= end {
            return;
        }
        debug_assert!(self.input.is_char_boundary(start));
        debug_assert!(self.input.is_char_boundary(end));
        let decoded = decode_entities(&self.input[start..end]);
        if !decoded.is_empty() {
            sink.text(&decoded);
        }
    }

    /// Consume one markup construct at `self.pos` (which holds `<`).
    /// Returns `false` when the rest of the input was consumed.
    fn markup<S: TokenSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        let rest = &self.input[self.pos..];
        if rest.starts_with(COMMENT_START) {
            let body = &rest[COMMENT_START.len()..];
            return match body.find(COMMENT_END) {
                Some(end) => {
                    sink.comment(&body[..end]);
                    self.pos += COMMENT_START.len() + end + COMMENT_END.len();
                    true
                }
                None => {
                    sink.comment(body);
                    false
                }
            };
        }
        if rest.as_bytes()[1] == b'!' {
            // Doctype or other declaration.
            return match rest.find('>') {
                Some(end) => {
                    sink.doctype(rest[2..end].trim());
                    self.pos += end + 1;
                    true
                }
                None => false,
            };
        }
        if rest.as_bytes()[1] == b'/' {
            self.end_tag(sink);
            return true;
        }
        self.start_tag(sink)
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_name_char(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_lowercase()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn end_tag<S: TokenSink + ?Sized>(&mut self, sink: &mut S) {
        self.pos += 2;
        let name = self.read_name();
        match memchr(b'>', &self.bytes[self.pos..]) {
            Some(rel) => self.pos += rel + 1,
            None => self.pos = self.bytes.len(),
        }
        if !name.is_empty() {
            sink.end_tag(&name);
        }
    }

    fn start_tag<S: TokenSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        self.pos += 1;
        let name = self.read_name();
        let mut attributes: Vec<Attribute> = Vec::new();
        let mut explicit_close = false;

        loop {
            self.skip_whitespace();
            let Some(&b) = self.bytes.get(self.pos) else {
                break;
            };
            if b == b'>' {
                self.pos += 1;
                break;
            }
            if b == b'/' {
                self.pos += 1;
                if self.bytes.get(self.pos) == Some(&b'>') {
                    explicit_close = true;
                    self.pos += 1;
                    break;
                }
                continue;
            }
            let attr_name = self.read_name();
            if attr_name.is_empty() {
                // Skip one whole character so the cursor stays on a boundary.
                self.pos += self.input[self.pos..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
            self.skip_whitespace();
            let value = if self.bytes.get(self.pos) == Some(&b'=') {
                self.pos += 1;
                self.skip_whitespace();
                Some(self.attribute_value())
            } else {
                None
            };
            attributes.push((attr_name, value));
        }

        let self_closing = explicit_close || is_void_element(&name);
        sink.start_tag(&name, &attributes, self_closing);
        if explicit_close {
            sink.end_tag(&name);
            return true;
        }

        let close_tag = match name.as_str() {
            "script" => SCRIPT_CLOSE_TAG,
            "style" => STYLE_CLOSE_TAG,
            _ => return true,
        };
        let body = &self.input[self.pos..];
        match find_rawtext_close_tag(body, close_tag) {
            Some((start, end)) => {
                if start > 0 {
                    sink.text(&body[..start]);
                }
                sink.end_tag(&name);
                self.pos += end;
                true
            }
            None => {
                // Missing close tag: the remainder is rawtext, closed implicitly.
                if !body.is_empty() {
                    sink.text(body);
                }
                sink.end_tag(&name);
                false
            }
        }
    }

    fn attribute_value(&mut self) -> String {
        match self.bytes.get(self.pos) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                self.pos += 1;
                let start = self.pos;
                let end = memchr(quote, &self.bytes[start..])
                    .map(|rel| start + rel)
                    .unwrap_or(self.bytes.len());
                self.pos = (end + 1).min(self.bytes.len());
                decode_entities(&self.input[start..end])
            }
            _ => {
                let start = self.pos;
                while self.pos < self.bytes.len() {
                    let b = self.bytes[self.pos];
                    if b.is_ascii_whitespace() || b == b'>' {
                        break;
                    }
                    if b == b'/' && self.bytes.get(self.pos + 1) == Some(&b'>') {
                        break;
                    }
                    self.pos += 1;
                }
                decode_entities(&self.input[start..self.pos])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, attributes: &[(&str, Option<&str>)], self_closing: bool) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
            self_closing,
        }
    }

    fn end(name: &str) -> Token {
        Token::EndTag(name.to_string())
    }

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    #[test]
    fn tokenize_lowercases_names_and_decodes_text() {
        let tokens = tokenize("<P Class=intro>Fish &amp; chips</p>");
        assert_eq!(
            tokens,
            vec![
                start("p", &[("class", Some("intro"))], false),
                text("Fish & chips"),
                end("p"),
            ]
        );
    }

    #[test]
    fn tokenize_reads_quoted_unquoted_and_bare_attributes() {
        let tokens = tokenize(r#"<a href="https://x.test/?a=1&amp;b=2" data-x='y' hidden rel=nofollow>"#);
        assert_eq!(
            tokens,
            vec![start(
                "a",
                &[
                    ("href", Some("https://x.test/?a=1&b=2")),
                    ("data-x", Some("y")),
                    ("hidden", None),
                    ("rel", Some("nofollow")),
                ],
                false
            )]
        );
    }

    #[test]
    fn explicit_self_closing_emits_end_event() {
        let tokens = tokenize("<p/><br>");
        assert_eq!(
            tokens,
            vec![start("p", &[], true), end("p"), start("br", &[], true)]
        );
    }

    #[test]
    fn comments_and_doctypes_go_to_their_hooks() {
        let tokens = tokenize("<!DOCTYPE html><!-- note -->x");
        assert_eq!(
            tokens,
            vec![
                Token::Doctype("DOCTYPE html".to_string()),
                Token::Comment(" note ".to_string()),
                text("x"),
            ]
        );
    }

    #[test]
    fn stray_angle_bracket_stays_in_text() {
        let tokens = tokenize("<td>a < b</td>");
        assert_eq!(tokens, vec![start("td", &[], false), text("a < b"), end("td")]);
    }

    #[test]
    fn stray_non_ascii_between_attributes_is_skipped() {
        assert_eq!(
            tokenize("<p title=\"x\"é>Hi</p>"),
            vec![start("p", &[("title", Some("x"))], false), text("Hi"), end("p")]
        );
        assert_eq!(
            tokenize("<p «note»>Hi</p>"),
            vec![start("p", &[("note", None)], false), text("Hi"), end("p")]
        );
    }

    #[test]
    fn script_body_is_rawtext_with_case_insensitive_close() {
        let tokens = tokenize("<script>if (a<b) {}</ScRiPt >after");
        assert_eq!(
            tokens,
            vec![
                start("script", &[], false),
                text("if (a<b) {}"),
                end("script"),
                text("after"),
            ]
        );
    }

    #[test]
    fn rawtext_without_close_tag_is_closed_implicitly() {
        let tokens = tokenize("<style>p{}");
        assert_eq!(
            tokens,
            vec![start("style", &[], false), text("p{}"), end("style")]
        );
    }

    #[test]
    fn preserves_utf8_text_around_tags() {
        let tokens = tokenize("é<b>ï</b>ö");
        assert_eq!(
            tokens,
            vec![text("é"), start("b", &[], false), text("ï"), end("b"), text("ö")]
        );
    }

    #[test]
    fn unterminated_comment_swallows_rest() {
        let tokens = tokenize("a<!-- b <p>");
        assert_eq!(tokens, vec![text("a"), Token::Comment(" b <p>".to_string())]);
    }

    #[test]
    fn handles_many_simple_tags_linearly() {
        let input = "<li></li>".repeat(20_000);
        assert_eq!(tokenize(&input).len(), 40_000);
    }

    #[test]
    fn handles_tons_of_angle_brackets() {
        let input = "<".repeat(200_000);
        assert_eq!(tokenize(&input), vec![text(&input)]);
    }
}
