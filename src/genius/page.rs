//! Lyrics extraction from Genius song pages.
//!
//! Song pages wrap the lyrics in one or more `data-lyrics-container="true"`
//! elements. Inside the first one Genius puts a header block (contributor
//! count, translations, "<Title> Lyrics") marked
//! `data-exclude-from-selection="true"`. The extracted document keeps that
//! header as its first line followed by a blank line, matching the text a
//! reader copies off the page.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Opening tag of a lyrics container.
#[allow(clippy::expect_used)]
static RE_CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div\b[^>]*\bdata-lyrics-container="true"[^>]*>"#)
        .expect("valid regex: RE_CONTAINER")
});

/// Opening tag of an element excluded from the lyric selection.
#[allow(clippy::expect_used)]
static RE_EXCLUDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<([a-z][a-z0-9-]*)\b[^>]*\bdata-exclude-from-selection="true"[^>]*>"#)
        .expect("valid regex: RE_EXCLUDED")
});

/// Any tag: (closing slash, name, self-closing slash).
#[allow(clippy::expect_used)]
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)\b[^>]*?(/?)>").expect("valid regex: RE_TAG")
});

#[allow(clippy::expect_used)]
static RE_BR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>").expect("valid regex: RE_BR")
});

#[allow(clippy::expect_used)]
static RE_ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]*>").expect("valid regex: RE_ANY_TAG")
});

#[allow(clippy::expect_used)]
static RE_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex: RE_ENTITY")
});

/// `[Verse 1]`, `[Chorus: Taylor Swift]` and friends.
#[allow(clippy::expect_used)]
static RE_SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^\]\n]*\]").expect("valid regex: RE_SECTION_HEADER")
});

#[allow(clippy::expect_used)]
static RE_BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("valid regex: RE_BLANK_RUNS")
});

/// Extract the lyrics document from a song page.
///
/// Returns `header + "\n\n" + body`, or `None` when the page has no lyrics
/// containers or they hold no text. When the page carries no header block
/// the header is `"<full_title> Lyrics"`.
pub fn extract_lyrics_document(html: &str, full_title: &str, remove_section_headers: bool) -> Option<String> {
    let mut header_parts = Vec::new();
    let mut body_parts = Vec::new();
    let mut cursor = 0;

    for open in RE_CONTAINER.find_iter(html) {
        // Containers nested in one we already consumed
        if open.start() < cursor {
            continue;
        }
        let Some((close_start, close_end)) = find_element_end(html, open.end(), "div") else {
            break;
        };

        let (headers, body) = split_excluded(&html[open.end()..close_start]);
        header_parts.extend(headers);
        body_parts.push(fragment_to_text(&body));
        cursor = close_end;
    }

    if body_parts.is_empty() {
        return None;
    }

    let mut body = body_parts.join("\n");
    if remove_section_headers {
        body = RE_SECTION_HEADER.replace_all(&body, "").into_owned();
    }
    let body = tidy_lines(&body);
    if body.is_empty() {
        return None;
    }

    let header = squeeze_whitespace(&header_parts.join(" "));
    let header = if header.is_empty() {
        format!("{full_title} Lyrics")
    } else {
        header
    };

    Some(format!("{header}\n\n{body}"))
}

/// Find the closing tag matching an element whose opening tag ends at `from`.
///
/// Returns the byte range of the closing tag.
fn find_element_end(html: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    for caps in RE_TAG.captures_iter(&html[from..]) {
        if !caps[2].eq_ignore_ascii_case(name) {
            continue;
        }
        let whole = caps.get(0)?;
        if !caps[1].is_empty() {
            depth -= 1;
            if depth == 0 {
                return Some((from + whole.start(), from + whole.end()));
            }
        } else if caps[3].is_empty() {
            depth += 1;
        }
    }
    None
}

/// Separate excluded header elements from the lyric markup around them.
fn split_excluded(fragment: &str) -> (Vec<String>, String) {
    let mut headers = Vec::new();
    let mut body = String::with_capacity(fragment.len());
    let mut cursor = 0;

    for caps in RE_EXCLUDED.captures_iter(fragment) {
        let Some(open) = caps.get(0) else { continue };
        if open.start() < cursor {
            continue;
        }
        let Some((close_start, close_end)) = find_element_end(fragment, open.end(), &caps[1]) else {
            break;
        };

        body.push_str(&fragment[cursor..open.start()]);
        // Header pieces sit in separate elements; keep them apart
        let spaced = RE_ANY_TAG.replace_all(&fragment[open.end()..close_start], " ");
        let text = squeeze_whitespace(&decode_entities(&spaced));
        if !text.is_empty() {
            headers.push(text);
        }
        cursor = close_end;
    }

    body.push_str(&fragment[cursor..]);
    (headers, body)
}

/// Turn an HTML fragment into plain text, keeping `<br>` as line breaks.
fn fragment_to_text(fragment: &str) -> String {
    let with_breaks = RE_BR.replace_all(fragment, "\n");
    let stripped = RE_ANY_TAG.replace_all(&with_breaks, "");
    decode_entities(&stripped)
}

/// Decode the HTML entities that show up in lyrics markup.
pub fn decode_entities(text: &str) -> String {
    RE_ENTITY
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    "lsquo" => Some('\u{2018}'),
                    "rsquo" => Some('\u{2019}'),
                    "ldquo" => Some('\u{201C}'),
                    "rdquo" => Some('\u{201D}'),
                    "ndash" => Some('\u{2013}'),
                    "mdash" => Some('\u{2014}'),
                    "hellip" => Some('\u{2026}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Trim line ends, collapse runs of blank lines to one, trim the whole.
fn tidy_lines(text: &str) -> String {
    let lines = text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    RE_BLANK_RUNS.replace_all(&lines, "\n\n").trim().to_string()
}

fn squeeze_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    const PAGE: &str = r#"<html><body>
<div id="lyrics-root">
<div data-lyrics-container="true" class="Lyrics__Container-sc-1 kUgSbL"><div data-exclude-from-selection="true" class="LyricsHeader__Container"><div><span>148 Contributors</span></div><h2>Love Story Lyrics</h2></div>[Verse 1]<br/>We were both young when I first saw you<br/>I close my eyes and the flashback starts<br/><br/>[Chorus]<br/><a href="/annotation"><span>Romeo, take me somewhere we can be alone</span></a><br/>I&#x27;ll be waiting, all there&#39;s left to do is run</div>
<div class="Ad"></div>
<div data-lyrics-container="true" class="Lyrics__Container-sc-1 kUgSbL">[Verse 2]<br/>You&apos;ll be the prince &amp; I&apos;ll be the princess<br/>It&#8217;s a love story</div>
</div>
</body></html>"#;

    #[test]
    fn extracts_header_then_lyrics() {
        let doc = extract_lyrics_document(PAGE, "Love Story by Taylor Swift", true).unwrap();
        let (header, body) = doc.split_once("\n\n").unwrap();
        assert_eq!(header, "148 Contributors Love Story Lyrics");
        assert!(body.starts_with("We were both young when I first saw you"));
        assert!(body.contains("Romeo, take me somewhere we can be alone"));
        assert!(body.contains("I'll be waiting, all there's left to do is run"));
        assert!(body.contains("You'll be the prince & I'll be the princess"));
        assert!(body.ends_with("It\u{2019}s a love story"));
    }

    #[test]
    fn section_headers_are_removed_when_asked() {
        let doc = extract_lyrics_document(PAGE, "Love Story by Taylor Swift", true).unwrap();
        assert!(!doc.contains("[Verse 1]"));
        assert!(!doc.contains("[Chorus]"));
        assert!(!doc.contains("\n\n\n"));
    }

    #[test]
    fn section_headers_are_kept_otherwise() {
        let doc = extract_lyrics_document(PAGE, "Love Story by Taylor Swift", false).unwrap();
        assert!(doc.contains("[Verse 1]\nWe were both young"));
        assert!(doc.contains("[Verse 2]"));
    }

    #[test]
    fn missing_header_block_uses_full_title() {
        let html = r#"<div data-lyrics-container="true">Line one<br/>Line two</div>"#;
        let doc = extract_lyrics_document(html, "Mine by Taylor Swift", true).unwrap();
        assert_eq!(doc, "Mine by Taylor Swift Lyrics\n\nLine one\nLine two");
    }

    #[test]
    fn nested_divs_stay_inside_their_container() {
        let html = r#"<div data-lyrics-container="true">a<br/><div class="inner">b</div>c</div><div>outside</div>"#;
        let doc = extract_lyrics_document(html, "T", true).unwrap();
        assert_eq!(doc, "T Lyrics\n\na\nbc");
    }

    #[test]
    fn page_without_containers_has_no_lyrics() {
        assert!(extract_lyrics_document("<html><div class=\"lyrics\"></div></html>", "T", true).is_none());
    }

    #[test]
    fn container_with_only_headers_has_no_lyrics() {
        let html = r#"<div data-lyrics-container="true">[Instrumental]</div>"#;
        assert!(extract_lyrics_document(html, "T", true).is_none());
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_entities("R&amp;B &lt;3 &#65;&#x42; &bogus;"), "R&B <3 AB &bogus;");
    }
}
