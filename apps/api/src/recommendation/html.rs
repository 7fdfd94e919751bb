//! Visible-text extraction from HTML.
//!
//! Not a conforming parser: tags are dropped, the bodies of non-visible
//! elements are skipped, comments are removed and entities decoded. Good
//! enough for job postings, which only need to feed an embedder.

/// Elements whose content is never rendered as text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "svg"];

pub fn extract_visible_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len() / 2);
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        push_decoded(&mut out, &rest[..lt]);
        rest = &rest[lt..];

        if rest.starts_with("<!--") {
            rest = rest.find("-->").map_or("", |end| &rest[end + 3..]);
            continue;
        }

        // "a < b" in text: '<' not followed by a tag start is literal.
        let opens_tag = rest[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?');
        if !opens_tag {
            out.push('<');
            rest = &rest[1..];
            continue;
        }

        let Some(gt) = rest.find('>') else {
            // Unterminated tag at end of input.
            rest = "";
            break;
        };
        let tag = &rest[1..gt];
        rest = &rest[gt + 1..];
        out.push(' ');

        let name = tag_name(tag);
        let self_closing = tag.trim_end().ends_with('/');
        if !tag.starts_with('/') && !self_closing && SKIPPED_ELEMENTS.contains(&name.as_str()) {
            rest = skip_element_body(rest, &name);
        }
    }

    push_decoded(&mut out, rest);
    out
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Returns the input after the matching `</name ...>`, or "" if it never closes.
fn skip_element_body<'a>(rest: &'a str, name: &str) -> &'a str {
    let closing = format!("</{name}");
    // ASCII lowercasing keeps byte offsets intact.
    let lowered = rest.to_ascii_lowercase();
    match lowered.find(&closing) {
        Some(start) => {
            let after = &rest[start..];
            after.find('>').map_or("", |gt| &after[gt + 1..])
        }
        None => "",
    }
}

fn push_decoded(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        // Entities are short; don't scan the whole document for a ';'.
        let decoded = rest
            .char_indices()
            .take(12)
            .find(|(_, c)| *c == ';')
            .and_then(|(semi, _)| decode_entity(&rest[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
}

fn decode_entity(entity: &str) -> Option<char> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '–',
        "mdash" => '—',
        "rsquo" | "lsquo" => '\'',
        "rdquo" | "ldquo" => '"',
        "hellip" => '…',
        "bull" => '•',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_strips_tags_and_keeps_text() {
        let html = "<html><head><title>Java Developer</title></head>\
                    <body><h1>About</h1><p>Build <b>backend</b> services.</p></body></html>";
        assert_eq!(
            squash(&extract_visible_text(html)),
            "Java Developer About Build backend services."
        );
    }

    #[test]
    fn test_drops_script_style_and_comments() {
        let html = r#"<p>Visible</p>
            <script type="text/javascript">var hidden = "<p>no</p>";</script>
            <STYLE>p { color: red }</STYLE>
            <!-- a comment <p>nope</p> -->
            <noscript>enable js</noscript>
            <p>Also visible</p>"#;
        assert_eq!(
            squash(&extract_visible_text(html)),
            "Visible Also visible"
        );
    }

    #[test]
    fn test_block_boundaries_do_not_glue_words() {
        assert_eq!(
            squash(&extract_visible_text("<li>SQL</li><li>Python</li>")),
            "SQL Python"
        );
    }

    #[test]
    fn test_decodes_entities() {
        assert_eq!(
            extract_visible_text("R&amp;D &lt;team&gt; &#65;&#x42; caf&eacute;"),
            "R&D <team> AB caf&eacute;"
        );
    }

    #[test]
    fn test_literal_less_than_in_text() {
        assert_eq!(
            squash(&extract_visible_text("<p>salary < 100k</p>")),
            "salary < 100k"
        );
    }

    #[test]
    fn test_unclosed_script_drops_remainder() {
        assert_eq!(
            squash(&extract_visible_text("<p>kept</p><script>never closed")),
            "kept"
        );
    }

    #[test]
    fn test_markup_only_yields_blank() {
        assert!(extract_visible_text("<div><span></span></div>")
            .trim()
            .is_empty());
    }
}
