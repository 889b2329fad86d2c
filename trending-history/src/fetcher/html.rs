//! Minimal tag slicing helpers for server-rendered HTML.
//!
//! Matching is ASCII case-insensitive. Offsets returned by these helpers are
//! byte offsets into the original input.

/// ASCII-lowercases `s`, leaving other characters untouched.
///
/// Byte offsets in the result match the input.
pub(crate) fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Finds the next complete `<tag ...>...</tag>` block starting at or after `from`.
///
/// Returns `(start, end)` where `end` is just past the closing tag. Nested
/// elements of the same name are not balanced.
pub(crate) fn next_block(lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut cursor = from;
    loop {
        let start = lower.get(cursor..)?.find(&open)? + cursor;
        let after_name = start + open.len();
        // Reject prefixes such as `<a` matching `<abbr`.
        match lower.as_bytes().get(after_name) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {}
            _ => {
                cursor = after_name;
                continue;
            }
        }
        let open_end = lower[start..].find('>')? + start + 1;
        let end = lower[open_end..].find(&close)? + open_end + close.len();
        return Some((start, end));
    }
}

/// Iterates over every `<tag>` block in `s`, in document order.
///
/// Scanning resumes after each opening tag, so an element nested inside an
/// earlier (unbalanced) block is still visited.
pub(crate) fn blocks<'a>(
    s: &'a str,
    lower: &'a str,
    tag: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        let (start, end) = next_block(lower, tag, cursor)?;
        cursor = start + open_tag(&s[start..end]).len();
        Some(&s[start..end])
    })
}

/// The opening tag of a block, including the angle brackets.
pub(crate) fn open_tag(block: &str) -> &str {
    block.find('>').map_or(block, |end| &block[..=end])
}

/// Content between the end of the opening tag and the start of the final closing tag.
pub(crate) fn inner(block: &str) -> &str {
    match (block.find('>'), block.rfind('<')) {
        (Some(open_end), Some(close_start)) if close_start > open_end => {
            &block[open_end + 1..close_start]
        }
        _ => "",
    }
}

/// Reads a double-quoted attribute value from an opening tag.
pub(crate) fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lower = to_lower(tag);
    let needle = format!("{}=\"", to_lower(name));

    let mut cursor = 0;
    while let Some(rel) = lower[cursor..].find(&needle) {
        let pos = cursor + rel;
        let preceded_by_space = pos > 0 && lower.as_bytes()[pos - 1].is_ascii_whitespace();
        let value_start = pos + needle.len();
        if preceded_by_space {
            let value_end = tag[value_start..].find('"')? + value_start;
            return Some(&tag[value_start..value_end]);
        }
        cursor = value_start;
    }
    None
}

/// Returns true if the tag's `class` attribute contains every given class.
pub(crate) fn has_classes(tag: &str, classes: &[&str]) -> bool {
    attr(tag, "class").is_some_and(|value| {
        classes
            .iter()
            .all(|class| value.split_ascii_whitespace().any(|c| c == *class))
    })
}

/// Removes tags and returns whitespace-normalized, entity-decoded text.
pub(crate) fn text<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    decode_entities(&normalize_ws(&out))
}

/// Collapses runs of whitespace to a single space and trims the ends.
pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes numeric references and the named entities GitHub emits in text content.
///
/// Unknown or malformed references are left as written.
pub(crate) fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= MAX_ENTITY_LEN)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

const MAX_ENTITY_LEN: usize = 10;

fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code);
    }

    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_block_skips_longer_tag_names() {
        let html = "<abbr>x</abbr><a href=\"/y\">y</a>";
        let lower = to_lower(html);
        let (start, end) = next_block(&lower, "a", 0).unwrap();
        assert_eq!(&html[start..end], "<a href=\"/y\">y</a>");
    }

    #[test]
    fn blocks_visits_nested_elements() {
        let html = r#"<span class="outer"><span itemprop="x">Go</span></span>"#;
        let lower = to_lower(html);
        let found: Vec<_> = blocks(html, &lower, "span")
            .filter_map(|b| attr(open_tag(b), "itemprop"))
            .collect();
        assert_eq!(found, vec!["x"]);
    }

    #[test]
    fn attr_ignores_prefixed_names() {
        let tag = r#"<a data-href="/wrong" HREF="/right">"#;
        assert_eq!(attr(tag, "href"), Some("/right"));
        assert_eq!(attr(tag, "title"), None);
    }

    #[test]
    fn has_classes_matches_whole_words() {
        let tag = r#"<article class="Box-row extra">"#;
        assert!(has_classes(tag, &["Box-row"]));
        assert!(!has_classes(tag, &["Box"]));
    }

    #[test]
    fn text_strips_tags_and_decodes() {
        assert_eq!(
            text("<p>\n  Fast &amp; <b>small</b>\n  tool &lt;3 </p>"),
            "Fast & small tool <3"
        );
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode_entities("It&#8217;s &#x27;fast&#x27;"), "It\u{2019}s 'fast'");
        assert_eq!(decode_entities("&#39;a&#39; &amp;lt;"), "'a' &lt;");
    }

    #[test]
    fn leaves_unknown_references() {
        assert_eq!(decode_entities("AT&T &bogus; &#xZZ; 5 & 6"), "AT&T &bogus; &#xZZ; 5 & 6");
        assert_eq!(decode_entities("&#1114112;"), "&#1114112;");
    }

    #[test]
    fn inner_returns_content() {
        assert_eq!(inner("<span class=\"x\">Rust</span>"), "Rust");
        assert_eq!(inner("<br>"), "");
    }
}
