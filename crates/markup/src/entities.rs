use memchr::memchr;

/// Named references we decode. Article bodies lean heavily on typographic
/// punctuation, so the table goes a little past the XML five.
const NAMED: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{00A0}'),
    ("ndash", '\u{2013}'),
    ("mdash", '\u{2014}'),
    ("hellip", '\u{2026}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201C}'),
    ("rdquo", '\u{201D}'),
    ("laquo", '\u{00AB}'),
    ("raquo", '\u{00BB}'),
    ("middot", '\u{00B7}'),
    ("bull", '\u{2022}'),
    ("times", '\u{00D7}'),
    ("copy", '\u{00A9}'),
    ("reg", '\u{00AE}'),
    ("trade", '\u{2122}'),
    ("deg", '\u{00B0}'),
];

const MAX_NAME_LEN: usize = 8;
const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111

/// Decode entity references in text or attribute values.
///
/// Contract:
/// - Named references from `NAMED`, semicolon-terminated.
/// - Numeric references `&#215;` and `&#xD7;`, semicolon-terminated, valid
///   Unicode scalar values only.
/// - Everything else (unknown names, missing semicolons, surrogates, overlong
///   digit runs) is copied through unchanged.
pub(crate) fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while let Some(rel) = memchr(b'&', &bytes[i..]) {
        let amp = i + rel;
        out.push_str(&s[i..amp]);
        match decode_reference(s, amp + 1) {
            Some((ch, next)) => {
                out.push(ch);
                i = next;
            }
            None => {
                out.push('&');
                i = amp + 1;
            }
        }
    }
    out.push_str(&s[i..]);
    out
}

/// Decode the reference starting right after `&`; returns the char and the
/// index just past the terminating `;`.
fn decode_reference(s: &str, start: usize) -> Option<(char, usize)> {
    let bytes = s.as_bytes();
    if bytes.get(start) == Some(&b'#') {
        let (digits_start, radix, max) = match bytes.get(start + 1) {
            Some(b'x' | b'X') => (start + 2, 16, MAX_HEX_DIGITS),
            _ => (start + 1, 10, MAX_DEC_DIGITS),
        };
        let end = scan_terminated(bytes, digits_start, max, |b| {
            if radix == 16 {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            }
        })?;
        let ch = u32::from_str_radix(&s[digits_start..end], radix)
            .ok()
            .and_then(char::from_u32)?;
        return Some((ch, end + 1));
    }

    let end = scan_terminated(bytes, start, MAX_NAME_LEN, |b| b.is_ascii_alphanumeric())?;
    let name = &s[start..end];
    NAMED
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, ch)| (*ch, end + 1))
}

/// Bounded scan for `[class]{1,max};`, returning the index of the `;`.
fn scan_terminated(bytes: &[u8], start: usize, max: usize, class: impl Fn(u8) -> bool) -> Option<usize> {
    let mut j = start;
    while j < bytes.len() && j - start <= max {
        let b = bytes[j];
        if b == b';' {
            return (j > start).then_some(j);
        }
        if !class(b) {
            return None;
        }
        j += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_references() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("1990&ndash;1995"), "1990\u{2013}1995");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{00A0}b");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode_entities("&#215;"), "×");
        assert_eq!(decode_entities("&#xD7;"), "×");
        assert_eq!(decode_entities("&#x10FFFF;"), "\u{10FFFF}");
    }

    #[test]
    fn passes_through_malformed_references() {
        for s in [
            "&",
            "&&",
            "&;",
            "&#;",
            "&#x;",
            "&amp",
            "loose &amp space",
            "&unknown;",
            "&#xD800;",
            "&#x110000;",
            "&#99999999;",
            "&#215 ",
        ] {
            assert_eq!(decode_entities(s), s, "input {s:?}");
        }
    }

    #[test]
    fn malformed_reference_does_not_swallow_following_one() {
        assert_eq!(decode_entities("&#xZZ;&amp;"), "&#xZZ;&");
        assert_eq!(decode_entities("&&amp;"), "&&");
    }

    #[test]
    fn keeps_utf8_around_references() {
        assert_eq!(decode_entities("π &amp; σ"), "π & σ");
    }
}
